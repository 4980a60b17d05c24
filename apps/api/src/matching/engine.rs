//! Matcher Orchestrator: scores a batch of candidates and ranks them.
//!
//! Scoring is pure and per-candidate independent; the full result set is sorted afterwards:
//! 1. score, descending
//! 2. matched skills + matched keywords, descending
//! 3. file name, ascending

use std::cmp::Ordering;

use tracing::debug;

use crate::matching::aggregate::{aggregate, CategoryWeights};
use crate::matching::models::{CategoryBreakdown, MatchResult};
use crate::matching::normalize::{normalize, token_set};
use crate::matching::requirements::Requirements;
use crate::matching::scorers::{score_experience, score_role, score_terms};
use crate::models::resume::Candidate;

pub fn match_resumes(candidates: &[Candidate], requirements: &Requirements) -> Vec<MatchResult> {
    match_resumes_with(candidates, requirements, &CategoryWeights::default())
}

pub fn match_resumes_with(
    candidates: &[Candidate],
    requirements: &Requirements,
    weights: &CategoryWeights,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = candidates
        .iter()
        .map(|candidate| match_candidate(candidate, requirements, weights))
        .collect();

    results.sort_by(compare_results);

    debug!(
        candidates = candidates.len(),
        top_score = results.first().map(|r| r.score),
        "scored resume batch"
    );

    results
}

/// Scores a single candidate. Missing text is treated as empty text.
pub fn match_candidate(
    candidate: &Candidate,
    requirements: &Requirements,
    weights: &CategoryWeights,
) -> MatchResult {
    let text = normalize(candidate.extracted_text.as_deref().unwrap_or(""));
    let tokens = token_set(&text);

    let role = score_role(&text, &tokens, &requirements.role);
    let skills = score_terms(&text, &tokens, &requirements.skills);
    let experience = score_experience(&text, &tokens, &requirements.experience);
    let keywords = score_terms(&text, &tokens, &requirements.keywords);

    let breakdown = CategoryBreakdown {
        role: role.score,
        skills: skills.score,
        experience: experience.score,
        keywords: keywords.score,
    };
    let (score, confidence) = aggregate(&breakdown, requirements, weights);

    MatchResult {
        resume_id: candidate.id.clone(),
        file_name: candidate.file_name.clone(),
        score,
        confidence,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        matched_keywords: keywords.matched,
        missing_keywords: keywords.missing,
        role_matched: role.matched,
        experience_matched: experience.matched,
        breakdown,
    }
}

pub fn compare_results(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.match_count().cmp(&a.match_count()))
        .then_with(|| a.file_name.cmp(&b.file_name))
}
