use anyhow::Context;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::matching::engine::match_resumes;
use crate::matching::models::MatchResult;
use crate::matching::requirements::{build_requirements, Requirements, RequirementsInput};
use crate::models::resume::Candidate;

#[derive(Deserialize)]
pub struct MatchRequest {
    #[serde(flatten)]
    pub requirements: RequirementsInput,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub requirements: Requirements,
    pub results: Vec<MatchResult>,
    pub message: String,
}

/// POST /api/v1/match
pub async fn handle_match(Json(req): Json<MatchRequest>) -> Result<Json<MatchResponse>, AppError> {
    if req.requirements.is_blank() {
        return Err(AppError::Validation(
            "Add at least one requirement before running match.".to_string(),
        ));
    }

    let candidates: Vec<Candidate> = req.candidates.into_iter().filter(Candidate::has_text).collect();
    if candidates.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No extracted text found yet. Upload a resume and wait for extraction.".to_string(),
        ));
    }

    let requirements = build_requirements(&req.requirements);
    let scored_requirements = requirements.clone();
    let results = tokio::task::spawn_blocking(move || match_resumes(&candidates, &scored_requirements))
        .await
        .context("match scoring task failed")?;

    Ok(Json(MatchResponse {
        message: scored_message(results.len()),
        requirements,
        results,
    }))
}

fn scored_message(count: usize) -> String {
    if count == 1 {
        "Scored 1 resume.".to_string()
    } else {
        format!("Scored {count} resumes.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_message_pluralizes() {
        assert_eq!(scored_message(1), "Scored 1 resume.");
        assert_eq!(scored_message(2), "Scored 2 resumes.");
        assert_eq!(scored_message(12), "Scored 12 resumes.");
    }
}
