//! Error types for the domain layer.
//!
//! The error taxonomy is deliberately small: every failure an
//! operation can produce is one of four expected business outcomes
//! (validation, conflict, invalid state, failed precondition) plus
//! not-found and infrastructure codes. None of them is transient;
//! the engine never retries on the caller's behalf.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be a positive integer, got {actual}")]
    NotPositive { field: String, actual: i64 },

    #[error("Field '{field}' is invalid: {reason}")]
    Invalid { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a not-positive validation error.
    pub fn not_positive(field: impl Into<String>, actual: i64) -> Self {
        ValidationError::NotPositive {
            field: field.into(),
            actual,
        }
    }

    /// Creates a generic invalid-field error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Business outcomes
    ValidationFailed,
    Conflict,
    InvalidState,
    PreconditionFailed,

    // Not found
    SessionNotFound,
    DocketEntryNotFound,
    VotingNotFound,
    JudgmentNotFound,
    DecisionNotFound,
    MemberNotFound,

    // Infrastructure
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Returns true for the not-found family of codes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::SessionNotFound
                | ErrorCode::DocketEntryNotFound
                | ErrorCode::VotingNotFound
                | ErrorCode::JudgmentNotFound
                | ErrorCode::DecisionNotFound
                | ErrorCode::MemberNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::PreconditionFailed => "PRECONDITION_FAILED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::DocketEntryNotFound => "DOCKET_ENTRY_NOT_FOUND",
            ErrorCode::VotingNotFound => "VOTING_NOT_FOUND",
            ErrorCode::JudgmentNotFound => "JUDGMENT_NOT_FOUND",
            ErrorCode::DecisionNotFound => "DECISION_NOT_FOUND",
            ErrorCode::MemberNotFound => "MEMBER_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and contextual details.
///
/// Details carry enough context to explain *why* an operation failed:
/// entity id, current status, attempted status.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Malformed or inconsistent input; caller-fixable, never retried.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field)
    }

    /// Concurrent modification or duplicate detected; caller should reload.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Operation not permitted in the entity's current status.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// A required upstream fact is missing.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PreconditionFailed, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field } => field.clone(),
            ValidationError::NotPositive { field, .. } => field.clone(),
            ValidationError::Invalid { field, .. } => field.clone(),
        };
        DomainError::validation(field, err.to_string())
    }
}
