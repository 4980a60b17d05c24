use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no Gemini key was configured at startup. Keyword matching still works.
    pub llm: Option<LlmClient>,
}

impl AppState {
    pub fn llm(&self) -> Result<&LlmClient, AppError> {
        self.llm
            .as_ref()
            .ok_or_else(|| LlmError::Config("Missing GEMINI_API_KEY.".to_string()).into())
    }
}
