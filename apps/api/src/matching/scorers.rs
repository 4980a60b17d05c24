//! Category scorers for role, skills/keywords and experience.
//!
//! Every scorer takes normalized resume text (and its token set where needed) and a
//! normalized requirement value. Empty requirements score 0 and never match.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::normalize::normalize;
use crate::matching::terms::{token_coverage, whole_phrase_match};

/// Partial credit when every role token appears but not as a contiguous phrase.
pub const ROLE_TOKEN_COVERAGE_SCORE: f64 = 0.7;
/// Partial credit when the experience phrase is covered by tokens but has no year counts.
pub const EXPERIENCE_TOKEN_COVERAGE_SCORE: f64 = 0.75;
/// Guards the experience ratio against floating rounding.
pub const SCORE_EPSILON: f64 = 0.0001;

lazy_static! {
    static ref YEARS_RE: Regex =
        Regex::new(r"\b([0-9]{1,2})\s*\+?\s*(?:years?|yrs?)\b").expect("valid regex");
}

/// Score for a single-value category (role, experience).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub matched: bool,
    pub score: f64,
}

impl CategoryScore {
    const NONE: CategoryScore = CategoryScore {
        matched: false,
        score: 0.0,
    };

    fn partial(score: f64) -> Self {
        Self {
            matched: false,
            score,
        }
    }
}

/// Score for a list category (skills, keywords). `matched` and `missing` keep requirement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermScore {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub score: f64,
}

pub fn score_role(text: &str, text_tokens: &HashSet<String>, requirement: &str) -> CategoryScore {
    if requirement.is_empty() {
        return CategoryScore::NONE;
    }
    if whole_phrase_match(text, requirement) {
        return CategoryScore {
            matched: true,
            score: 1.0,
        };
    }
    if token_coverage(text_tokens, requirement) {
        return CategoryScore::partial(ROLE_TOKEN_COVERAGE_SCORE);
    }
    CategoryScore::NONE
}

/// A term matches on a whole-phrase hit or full token coverage.
pub fn score_terms(text: &str, text_tokens: &HashSet<String>, requirements: &[String]) -> TermScore {
    if requirements.is_empty() {
        return TermScore::default();
    }

    let (matched, missing): (Vec<String>, Vec<String>) = requirements
        .iter()
        .cloned()
        .partition(|term| whole_phrase_match(text, term) || token_coverage(text_tokens, term));

    let score = matched.len() as f64 / requirements.len() as f64;
    TermScore {
        matched,
        missing,
        score,
    }
}

/// Experience: whole phrase → 1.0; otherwise compare the largest "N years" on each side;
/// with no year counts on either side, fall back to token coverage of the phrase.
pub fn score_experience(
    text: &str,
    text_tokens: &HashSet<String>,
    requirement: &str,
) -> CategoryScore {
    if requirement.is_empty() {
        return CategoryScore::NONE;
    }
    if whole_phrase_match(text, requirement) {
        return CategoryScore {
            matched: true,
            score: 1.0,
        };
    }

    let required = find_years(requirement).into_iter().max();
    let available = find_years(text).into_iter().max();

    match (required, available) {
        (Some(required), Some(available)) => {
            // "0 years" asks for nothing, so any mention satisfies it.
            let ratio = if required == 0 {
                1.0
            } else {
                available as f64 / required as f64
            };
            let score = ratio.clamp(0.0, 1.0);
            CategoryScore {
                matched: score >= 1.0 - SCORE_EPSILON,
                score,
            }
        }
        _ if token_coverage(text_tokens, requirement) => {
            CategoryScore::partial(EXPERIENCE_TOKEN_COVERAGE_SCORE)
        }
        _ => CategoryScore::NONE,
    }
}

/// Extracts distinct year counts from mentions like "5 years", "10+ yrs", "3yr".
pub fn find_years(value: &str) -> Vec<u32> {
    let mut years: Vec<u32> = Vec::new();
    for caps in YEARS_RE.captures_iter(&normalize(value)) {
        if let Ok(year) = caps[1].parse::<u32>() {
            if !years.contains(&year) {
                years.push(year);
            }
        }
    }
    years
}
