//! HTTP DTOs for decision endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::decision::{Decision, Publication};
use crate::domain::foundation::DecisionStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a decision from a judgment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDecisionRequest {
    pub judgment_id: String,
    pub ementa_title: String,
    pub ementa_body: String,
    pub vote_path: Option<String>,
}

/// Request to publish (or republish) a decision.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishDecisionRequest {
    pub publication_number: String,
    pub publication_date: NaiveDate,
    pub republish_reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Decision details.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse {
    pub id: String,
    pub judgment_id: String,
    pub number: u32,
    pub year: i32,
    pub ementa_title: String,
    pub status: DecisionStatus,
    pub publication_count: usize,
}

impl From<&Decision> for DecisionResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            id: decision.id().to_string(),
            judgment_id: decision.judgment_id().to_string(),
            number: decision.number(),
            year: decision.year(),
            ementa_title: decision.ementa_title().to_string(),
            status: decision.status(),
            publication_count: decision.publications().len(),
        }
    }
}

/// One publication version.
#[derive(Debug, Clone, Serialize)]
pub struct PublicationResponse {
    pub order: u32,
    pub publication_number: String,
    pub publication_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub republish_reason: Option<String>,
}

impl From<&Publication> for PublicationResponse {
    fn from(publication: &Publication) -> Self {
        Self {
            order: publication.order(),
            publication_number: publication.publication_number().to_string(),
            publication_date: publication.publication_date(),
            republish_reason: publication.republish_reason().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_request_deserializes_without_reason() {
        let json = r#"{"publication_number": "DJ-2026-118", "publication_date": "2026-03-09"}"#;
        let request: PublishDecisionRequest = serde_json::from_str(json).unwrap();
        assert!(request.republish_reason.is_none());
    }
}
