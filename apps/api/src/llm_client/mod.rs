//! LLM client: the single point of entry for all Gemini calls in the matcher.
//!
//! No other module may call the generative-text API directly. Callers build a prompt,
//! then ask for a typed result through `call_structured`, which:
//! 1. POSTs the prompt, racing each attempt against the configured timeout
//! 2. retries timeouts and HTTP 429/500/503 with exponential backoff
//! 3. strips code fences, parses a JSON object, and hands it to the type's validator
//!
//! The config (key, model, timeout, retries) is fixed when the client is built; a client
//! cannot be built without an API key.

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod prompts;
pub mod retry;

pub use config::{LlmConfig, LlmOverrides};

use retry::retry_with_backoff;

const TEMPERATURE: f32 = 0.1;
const RESPONSE_MIME_TYPE: &str = "application/json";

lazy_static! {
    static ref FENCED_BLOCK_RE: Regex =
        Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("valid regex");
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini request failed ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Gemini request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Gemini request task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Schema(String),
}

/// Coarse error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Config,
    Transport,
    Schema,
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Validation(_) => ErrorKind::Validation,
            LlmError::Config(_) => ErrorKind::Config,
            LlmError::Http(_)
            | LlmError::Api { .. }
            | LlmError::Timeout { .. }
            | LlmError::TaskFailed(_) => ErrorKind::Transport,
            LlmError::Schema(_) => ErrorKind::Schema,
        }
    }

    /// Only timeouts and HTTP 429/500/503 are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::Timeout { .. } => true,
            LlmError::Http(e) => e.is_timeout(),
            LlmError::Api { status, .. } => matches!(status, 429 | 500 | 503),
            _ => false,
        }
    }
}

/// A record that can only be built by validating a parsed LLM JSON object.
pub trait StructuredResponse: Sized {
    fn from_json(object: &Map<String, Value>) -> Result<Self, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

impl<'a> GenerateContentRequest<'a> {
    fn user_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseCandidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Text of the first part that carries text, in the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| part.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini client with per-attempt timeout, retry and structured-output validation.
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http = Client::builder().build()?;
        debug!(
            model = %config.model,
            retries = config.retry.retries,
            worst_case_ms = config.retry.worst_case(config.timeout).as_millis() as u64,
            "LLM client configured"
        );
        Ok(Self { http, config })
    }

    /// Builds a client from `GEMINI_*` environment variables. Fails without an API key.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(LlmConfig::from_env(&LlmOverrides::default())?)
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// A client for one call with the given overrides applied.
    pub fn with_overrides(&self, overrides: &LlmOverrides) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.with_overrides(overrides),
        }
    }

    /// Sends `prompt` and validates the reply into `T`.
    /// Validation failures are returned as-is and never retried.
    pub async fn call_structured<T: StructuredResponse>(&self, prompt: &str) -> Result<T, LlmError> {
        let object = self.call_json_object(prompt).await?;
        T::from_json(&object)
    }

    /// Sends `prompt` with retries and returns the reply parsed as a JSON object.
    pub async fn call_json_object(&self, prompt: &str) -> Result<Map<String, Value>, LlmError> {
        require_server_runtime("Gemini API calls")?;

        let url = self.config.generate_url()?;
        let body = GenerateContentRequest::user_prompt(prompt);
        retry_with_backoff(&self.config.retry, LlmError::is_retryable, |attempt| {
            self.attempt(&url, &body, attempt)
        })
        .await
    }

    /// One POST raced against the timeout. On timeout the spawned request keeps running
    /// in the background and its eventual response is dropped.
    async fn attempt(
        &self,
        url: &Url,
        body: &GenerateContentRequest<'_>,
        attempt: u32,
    ) -> Result<Map<String, Value>, LlmError> {
        let pending = self
            .http
            .post(url.clone())
            .query(&[("key", self.config.api_key.as_str())])
            .json(body)
            .send();
        let request = tokio::spawn(pending);

        let response = match tokio::time::timeout(self.config.timeout, request).await {
            Ok(joined) => joined??,
            Err(_) => {
                return Err(LlmError::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                })
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            let message = if message.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                message
            };
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Schema(format!("Gemini response was not valid JSON: {e}")))?;

        if let Some(usage) = &payload.usage_metadata {
            debug!(
                attempt,
                model = %self.config.model,
                prompt_tokens = ?usage.prompt_token_count,
                output_tokens = ?usage.candidates_token_count,
                "Gemini call succeeded"
            );
        }

        let text = payload
            .text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                LlmError::Schema("Gemini response did not include text content.".to_string())
            })?;

        parse_json_object(strip_json_fences(text))
    }
}

/// Fails with a config error outside a Tokio runtime; the client only runs server-side.
fn require_server_runtime(operation: &str) -> Result<(), LlmError> {
    tokio::runtime::Handle::try_current()
        .map(|_| ())
        .map_err(|_| LlmError::Config(format!("{operation} must run on the server.")))
}

/// Parses `raw` and requires a JSON object at the top level.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, LlmError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| LlmError::Schema(format!("LLM response was not valid JSON: {e}")))?;
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(LlmError::Schema(
            "LLM response must be a JSON object.".to_string(),
        )),
    }
}

/// Returns the first ```json ... ``` (or bare ```) block anywhere in the reply, else the
/// trimmed reply. An opening fence that is never closed is dropped.
pub fn strip_json_fences(text: &str) -> &str {
    if let Some(block) = FENCED_BLOCK_RE.captures(text).and_then(|caps| caps.get(1)) {
        return block.as_str();
    }

    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    match stripped.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => stripped[4..].trim(),
        _ => stripped.trim(),
    }
}
