//! Weighted Aggregator: combines category scores into a 0–100 score.
//!
//! Categories with an empty requirement carry no weight; the remaining base weights are
//! rescaled to sum to 1. With no active category the score is 0.

use serde::{Deserialize, Serialize};

use crate::matching::models::CategoryBreakdown;
use crate::matching::requirements::Requirements;

pub const STRONG_THRESHOLD: u32 = 80;
pub const MODERATE_THRESHOLD: u32 = 55;

/// Coarse label derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Strong,
    Moderate,
    Low,
}

impl Confidence {
    pub fn from_score(score: u32) -> Self {
        if score >= STRONG_THRESHOLD {
            Confidence::Strong
        } else if score >= MODERATE_THRESHOLD {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub role: f64,
    pub skills: f64,
    pub experience: f64,
    pub keywords: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            role: 0.25,
            skills: 0.35,
            experience: 0.15,
            keywords: 0.25,
        }
    }
}

impl CategoryWeights {
    /// Zeroes the weight of every empty requirement category and rescales the rest to sum to 1.
    /// Returns all zeros when no category is active.
    pub fn renormalized_for(&self, requirements: &Requirements) -> Self {
        let active = Self {
            role: if requirements.role.is_empty() { 0.0 } else { self.role },
            skills: if requirements.skills.is_empty() { 0.0 } else { self.skills },
            experience: if requirements.experience.is_empty() {
                0.0
            } else {
                self.experience
            },
            keywords: if requirements.keywords.is_empty() {
                0.0
            } else {
                self.keywords
            },
        };

        let total = active.role + active.skills + active.experience + active.keywords;
        if total <= 0.0 {
            return Self {
                role: 0.0,
                skills: 0.0,
                experience: 0.0,
                keywords: 0.0,
            };
        }

        Self {
            role: active.role / total,
            skills: active.skills / total,
            experience: active.experience / total,
            keywords: active.keywords / total,
        }
    }
}

/// Returns the rounded 0–100 score and its confidence band.
pub fn aggregate(
    breakdown: &CategoryBreakdown,
    requirements: &Requirements,
    weights: &CategoryWeights,
) -> (u32, Confidence) {
    if requirements.is_empty() {
        return (0, Confidence::Low);
    }

    let w = weights.renormalized_for(requirements);
    let raw = breakdown.role * w.role
        + breakdown.skills * w.skills
        + breakdown.experience * w.experience
        + breakdown.keywords * w.keywords;

    let score = to_percent_score(raw);
    (score, Confidence::from_score(score))
}

fn to_percent_score(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements(role: &str, skills: &[&str], experience: &str, keywords: &[&str]) -> Requirements {
        Requirements {
            role: role.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: experience.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn breakdown(role: f64, skills: f64, experience: f64, keywords: f64) -> CategoryBreakdown {
        CategoryBreakdown {
            role,
            skills,
            experience,
            keywords,
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = CategoryWeights::default();
        assert!((w.role + w.skills + w.experience + w.keywords - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_categories_full_scores_100() {
        let req = requirements("dev", &["rust"], "5 years", &["fintech"]);
        let (score, confidence) =
            aggregate(&breakdown(1.0, 1.0, 1.0, 1.0), &req, &CategoryWeights::default());
        assert_eq!(score, 100);
        assert_eq!(confidence, Confidence::Strong);
    }

    #[test]
    fn test_empty_categories_are_renormalized_away() {
        // Only skills active: its score alone decides the result.
        let req = requirements("", &["rust", "go"], "", &[]);
        let (score, _) = aggregate(&breakdown(0.0, 0.5, 0.0, 0.0), &req, &CategoryWeights::default());
        assert_eq!(score, 50);
    }

    #[test]
    fn test_renormalized_weights_keep_ratios() {
        let req = requirements("dev", &[], "", &["fintech"]);
        let w = CategoryWeights::default().renormalized_for(&req);
        assert!((w.role - 0.5).abs() < 1e-12);
        assert!((w.keywords - 0.5).abs() < 1e-12);
        assert_eq!(w.skills, 0.0);
        assert_eq!(w.experience, 0.0);
    }

    #[test]
    fn test_no_requirements_scores_zero() {
        let req = Requirements::default();
        let (score, confidence) =
            aggregate(&breakdown(1.0, 1.0, 1.0, 1.0), &req, &CategoryWeights::default());
        assert_eq!(score, 0);
        assert_eq!(confidence, Confidence::Low);
    }

    #[test]
    fn test_weighted_mix() {
        // 0.25*1 + 0.35*1 + 0.15*0 + 0.25*0.2 = 0.65
        let req = requirements("dev", &["a1", "b1"], "5 years", &["k1"]);
        let (score, confidence) =
            aggregate(&breakdown(1.0, 1.0, 0.0, 0.2), &req, &CategoryWeights::default());
        assert_eq!(score, 65);
        assert_eq!(confidence, Confidence::Moderate);
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(Confidence::from_score(100), Confidence::Strong);
        assert_eq!(Confidence::from_score(80), Confidence::Strong);
        assert_eq!(Confidence::from_score(79), Confidence::Moderate);
        assert_eq!(Confidence::from_score(55), Confidence::Moderate);
        assert_eq!(Confidence::from_score(54), Confidence::Low);
        assert_eq!(Confidence::from_score(0), Confidence::Low);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Confidence::Moderate).unwrap(), "\"moderate\"");
    }
}
