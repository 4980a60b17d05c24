pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::enrichment::handlers as enrichment;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Keyword matching
        .route("/api/v1/match", post(matching::handle_match))
        // LLM-backed
        .route("/api/v1/match/llm", post(enrichment::handle_llm_match))
        .route("/api/v1/enrich", post(enrichment::handle_enrich))
        .with_state(state)
}
