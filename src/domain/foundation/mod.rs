//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers, status enums, and error types that form
//! the vocabulary of the appeals-board domain.

mod command;
mod decision_status;
mod docket_status;
mod errors;
mod events;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;
mod voting_status;

pub use command::CommandMetadata;
pub use decision_status::DecisionStatus;
pub use docket_status::DocketStatus;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata};
pub use ids::{
    CaseId, DecisionId, DecisionTextId, DocketEntryId, JudgmentId, MemberId, SessionId, VoteId,
    VotingId,
};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
pub use voting_status::VotingStatus;
