use serde::{Deserialize, Serialize};

/// Extraction lifecycle of a stored resume: `uploaded → extracting → ready | error`.
/// The store owns transitions; scoring never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Uploaded,
    Extracting,
    Ready,
    Error,
}

/// A resume row as supplied by the caller for scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    #[serde(alias = "file_name")]
    pub file_name: String,
    #[serde(default, alias = "extracted_text")]
    pub extracted_text: Option<String>,
    #[serde(default)]
    pub status: Option<ResumeStatus>,
}

impl Candidate {
    /// True when the candidate has non-blank extracted text.
    pub fn has_text(&self) -> bool {
        self.extracted_text
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty())
    }
}

/// Prior enrichment fields of a resume, used as the resume side of an LLM match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeStructuredData {
    #[serde(default)]
    pub llm_summary: Option<String>,
    #[serde(default)]
    pub llm_skills: Option<Vec<String>>,
    #[serde(default)]
    pub llm_roles: Option<Vec<String>>,
    #[serde(default)]
    pub llm_experience_years: Option<f64>,
    #[serde(default)]
    pub extracted_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accepts_snake_case_store_fields() {
        let json = r#"{
            "id": "r-1",
            "file_name": "jane.pdf",
            "extracted_text": "Rust engineer",
            "status": "ready"
        }"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.file_name, "jane.pdf");
        assert_eq!(candidate.status, Some(ResumeStatus::Ready));
        assert!(candidate.has_text());
    }

    #[test]
    fn test_candidate_accepts_camel_case_fields() {
        let json = r#"{"id": "r-2", "fileName": "bob.docx", "extractedText": null}"#;
        let candidate: Candidate = serde_json::from_str(json).unwrap();
        assert_eq!(candidate.file_name, "bob.docx");
        assert!(candidate.extracted_text.is_none());
        assert!(candidate.status.is_none());
    }

    #[test]
    fn test_blank_text_is_not_usable() {
        let candidate = Candidate {
            id: "r-3".to_string(),
            file_name: "blank.pdf".to_string(),
            extracted_text: Some("  \n ".to_string()),
            status: Some(ResumeStatus::Extracting),
        };
        assert!(!candidate.has_text());
    }

    #[test]
    fn test_structured_data_defaults_missing_fields() {
        let data: ResumeStructuredData = serde_json::from_str(r#"{"llm_skills": ["Go"]}"#).unwrap();
        assert_eq!(data.llm_skills, Some(vec!["Go".to_string()]));
        assert!(data.llm_summary.is_none());
        assert!(data.llm_experience_years.is_none());
    }
}
