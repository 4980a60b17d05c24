// All LLM prompts for resume enrichment and LLM-based matching.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::json;

use crate::llm_client::prompts::{NO_FENCES_RULE, STRICT_JSON_SHAPE};
use crate::matching::requirements::Requirements;
use crate::models::resume::ResumeStructuredData;

pub const ENRICHMENT_SCHEMA: &str = r#"{ "llm_summary": string, "llm_skills": string[], "llm_roles": string[], "llm_experience_years": number | null }"#;

pub const MATCH_SCHEMA: &str = r#"{ "match_score": number, "matched_skills": string[], "missing_skills": string[], "match_summary": string }"#;

pub fn build_enrichment_prompt(resume_text: &str) -> String {
    [
        "Extract structured candidate information from the resume text.",
        STRICT_JSON_SHAPE,
        ENRICHMENT_SCHEMA,
        "Rules:",
        "- llm_summary: 2-4 sentence concise profile summary.",
        "- llm_skills: unique list of technical/professional skills.",
        "- llm_roles: unique list of inferred job roles/titles.",
        "- llm_experience_years: best estimate as a number, or null if unknown.",
        NO_FENCES_RULE,
        "",
        "Resume Text:",
        resume_text,
    ]
    .join("\n")
}

/// Embeds the requirements and the resume's structured data as literal JSON.
/// Absent resume fields are sent as `""`, `[]` or `null`.
pub fn build_match_prompt(requirements: &Requirements, resume: &ResumeStructuredData) -> String {
    let requirements_json = json!({
        "role": requirements.role,
        "skills": requirements.skills,
        "experience": requirements.experience,
        "keywords": requirements.keywords,
    })
    .to_string();

    let resume_json = json!({
        "llm_summary": resume.llm_summary.as_deref().unwrap_or(""),
        "llm_skills": resume.llm_skills.as_deref().unwrap_or(&[]),
        "llm_roles": resume.llm_roles.as_deref().unwrap_or(&[]),
        "llm_experience_years": resume.llm_experience_years,
        "extracted_text": resume.extracted_text.as_deref().unwrap_or(""),
    })
    .to_string();

    [
        "You are an AI resume matching assistant. Evaluate how well a resume matches job requirements.",
        STRICT_JSON_SHAPE,
        MATCH_SCHEMA,
        "Scoring guidance:",
        "- match_score must be 0 to 100.",
        "- Evaluate semantic alignment across role, skills, experience, and overall relevance.",
        "- matched_skills should contain only skills present in both requirements and resume.",
        "- missing_skills should contain required skills not evident in the resume.",
        "- match_summary should be concise and specific.",
        NO_FENCES_RULE,
        "",
        "Job Requirements:",
        requirements_json.as_str(),
        "",
        "Resume Data:",
        resume_json.as_str(),
    ]
    .join("\n")
}
