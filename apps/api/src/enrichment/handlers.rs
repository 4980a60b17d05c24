use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enrichment::{enrich_resume, match_resume_with_llm, EnrichmentResult, LlmMatchResult};
use crate::errors::AppError;
use crate::llm_client::LlmOverrides;
use crate::matching::requirements::{build_requirements, RequirementsInput};
use crate::models::resume::ResumeStructuredData;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct EnrichRequest {
    pub resume_text: String,
    #[serde(flatten)]
    pub overrides: LlmOverrides,
}

#[derive(Serialize)]
pub struct EnrichResponse {
    pub enrichment: EnrichmentResult,
    pub processed_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct LlmMatchRequest {
    #[serde(default)]
    pub requirements: RequirementsInput,
    #[serde(default)]
    pub resume: ResumeStructuredData,
    #[serde(flatten)]
    pub overrides: LlmOverrides,
}

/// POST /api/v1/enrich
pub async fn handle_enrich(
    State(state): State<AppState>,
    Json(req): Json<EnrichRequest>,
) -> Result<Json<EnrichResponse>, AppError> {
    let llm = state.llm()?.with_overrides(&req.overrides);
    let enrichment = enrich_resume(&req.resume_text, &llm).await?;
    Ok(Json(EnrichResponse {
        enrichment,
        processed_at: Utc::now(),
    }))
}

/// POST /api/v1/match/llm
pub async fn handle_llm_match(
    State(state): State<AppState>,
    Json(req): Json<LlmMatchRequest>,
) -> Result<Json<LlmMatchResult>, AppError> {
    let llm = state.llm()?.with_overrides(&req.overrides);
    let requirements = build_requirements(&req.requirements);
    let result = match_resume_with_llm(&requirements, &req.resume, &llm).await?;
    Ok(Json(result))
}
