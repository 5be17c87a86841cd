//! HTTP DTOs for session endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionStatus;
use crate::domain::session::Session;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub year: i32,
    pub session_date: NaiveDate,
    /// Board member roster for the session.
    pub member_ids: Vec<String>,
    pub notes: Option<String>,
}

/// Request to add a case to the docket.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCaseRequest {
    pub case_id: String,
}

/// Request to publish the docket.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishDocketRequest {
    pub publication_number: String,
    pub publication_date: NaiveDate,
}

/// Request to cancel a session.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSessionRequest {
    pub reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Session details.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub ordinal: u32,
    pub year: i32,
    pub session_date: NaiveDate,
    pub status: SessionStatus,
    pub member_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub entry_count: usize,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            ordinal: session.ordinal(),
            year: session.year(),
            session_date: session.session_date(),
            status: session.status(),
            member_ids: session.member_ids().iter().map(|id| id.to_string()).collect(),
            notes: session.notes().map(String::from),
            entry_count: session.entry_count(),
        }
    }
}

/// Response after adding a case to the docket.
#[derive(Debug, Clone, Serialize)]
pub struct CaseAddedResponse {
    pub docket_entry_id: String,
    pub position: u32,
}
