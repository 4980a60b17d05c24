//! LLM-backed operations: resume enrichment and semantic requirement matching.
//!
//! Both go through `LlmClient::call_structured`, so they inherit its timeout, retry and
//! validation behavior. Neither touches the keyword matcher.

pub mod handlers;
pub mod prompts;
pub mod validation;

use tracing::info;

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::requirements::Requirements;
use crate::models::resume::ResumeStructuredData;

use prompts::{build_enrichment_prompt, build_match_prompt};
pub use validation::{EnrichmentResult, LlmMatchResult};

/// Extracts a summary, skills, roles and years of experience from raw resume text.
pub async fn enrich_resume(resume_text: &str, llm: &LlmClient) -> Result<EnrichmentResult, LlmError> {
    let text = resume_text.trim();
    if text.is_empty() {
        return Err(LlmError::Validation(
            "Cannot enrich empty resume text.".to_string(),
        ));
    }

    let enrichment: EnrichmentResult = llm.call_structured(&build_enrichment_prompt(text)).await?;
    info!(
        skills = enrichment.skills.len(),
        roles = enrichment.roles.len(),
        "Resume enriched"
    );
    Ok(enrichment)
}

pub async fn match_resume_with_llm(
    requirements: &Requirements,
    resume: &ResumeStructuredData,
    llm: &LlmClient,
) -> Result<LlmMatchResult, LlmError> {
    let prompt = build_match_prompt(requirements, resume);
    let result: LlmMatchResult = llm.call_structured(&prompt).await?;
    info!(score = result.score, "LLM match scored");
    Ok(result)
}
