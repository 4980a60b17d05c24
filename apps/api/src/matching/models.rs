use serde::{Deserialize, Serialize};

use crate::matching::aggregate::Confidence;

/// Per-category scores, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub role: f64,
    pub skills: f64,
    pub experience: f64,
    pub keywords: f64,
}

/// Explainable match outcome for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub resume_id: String,
    pub file_name: String,
    pub score: u32, // 0 – 100
    pub confidence: Confidence,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub role_matched: bool,
    pub experience_matched: bool,
    pub breakdown: CategoryBreakdown,
}

impl MatchResult {
    /// Matched skills plus matched keywords; the first tie-breaker after score.
    pub fn match_count(&self) -> usize {
        self.matched_skills.len() + self.matched_keywords.len()
    }
}
