//! Requirements Builder: turns raw requirement fields into a normalized record.

use serde::{Deserialize, Serialize};

use crate::matching::normalize::normalize;

/// Raw, caller-supplied requirement fields.
/// `skills` and `keywords` are comma or newline separated lists.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequirementsInput {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub keywords: String,
}

impl RequirementsInput {
    /// True when every field is blank.
    pub fn is_blank(&self) -> bool {
        [&self.role, &self.skills, &self.experience, &self.keywords]
            .iter()
            .all(|value| value.trim().is_empty())
    }
}

/// Normalized requirements. Skills and keywords are deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub role: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub keywords: Vec<String>,
}

impl Requirements {
    pub fn is_empty(&self) -> bool {
        self.role.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.keywords.is_empty()
    }
}

pub fn build_requirements(input: &RequirementsInput) -> Requirements {
    Requirements {
        role: normalize(&input.role),
        skills: parse_list(&input.skills),
        experience: normalize(&input.experience),
        keywords: parse_list(&input.keywords),
    }
}

/// Splits on commas or newlines, normalizes each segment, drops empties and duplicates.
fn parse_list(value: &str) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for segment in value.split([',', '\n']) {
        let item = normalize(segment);
        if !item.is_empty() && !items.contains(&item) {
            items.push(item);
        }
    }
    items
}
