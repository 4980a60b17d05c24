//! Response validators. Enrichment and LLM match records are only built through these.
//!
//! Required text fields fail with a schema error. Everything else is coerced:
//! - string lists: trimmed, non-empty, deduplicated; non-lists become `[]`
//! - numbers: finite numbers or numeric-looking strings, else `null`
//! - match score: defaults to 0, rounded and clamped to 0..=100

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::llm_client::{LlmError, StructuredResponse};

lazy_static! {
    static ref LEADING_NUMBER_RE: Regex =
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?")
            .expect("valid regex");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    #[serde(rename = "llm_summary")]
    pub summary: String,
    #[serde(rename = "llm_skills")]
    pub skills: Vec<String>,
    #[serde(rename = "llm_roles")]
    pub roles: Vec<String>,
    #[serde(rename = "llm_experience_years")]
    pub experience_years: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmMatchResult {
    #[serde(rename = "match_score")]
    pub score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    #[serde(rename = "match_summary")]
    pub summary: String,
}

impl StructuredResponse for EnrichmentResult {
    fn from_json(object: &Map<String, Value>) -> Result<Self, LlmError> {
        let summary = required_text(object, "llm_summary").ok_or_else(|| {
            LlmError::Schema("Invalid enrichment payload: llm_summary is required.".to_string())
        })?;

        Ok(Self {
            summary,
            skills: string_list(object.get("llm_skills")),
            roles: string_list(object.get("llm_roles")),
            experience_years: number_or_null(object.get("llm_experience_years")),
        })
    }
}

impl StructuredResponse for LlmMatchResult {
    fn from_json(object: &Map<String, Value>) -> Result<Self, LlmError> {
        let summary = required_text(object, "match_summary").ok_or_else(|| {
            LlmError::Schema("Invalid match payload: match_summary is required.".to_string())
        })?;

        Ok(Self {
            score: clamp_score(number_or_null(object.get("match_score")).unwrap_or(0.0)),
            matched_skills: string_list(object.get("matched_skills")),
            missing_skills: string_list(object.get("missing_skills")),
            summary,
        })
    }
}

fn required_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trimmed, non-empty strings in first-seen order. Non-string items are dropped.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    let mut out: Vec<String> = Vec::new();
    for item in items {
        if let Some(s) = item.as_str().map(str::trim).filter(|s| !s.is_empty()) {
            if !out.iter().any(|existing| existing == s) {
                out.push(s.to_string());
            }
        }
    }
    out
}

/// Finite JSON numbers pass through; strings are read by their leading number ("7.5 years").
pub fn number_or_null(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => LEADING_NUMBER_RE
            .find(s.trim())
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn clamp_score(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u32
}
