//! SetCaseStatusHandler - command handler for docket-entry excursions.
//!
//! Moves an entry between `OnDocket` and its excursion statuses
//! (`Suspended`, `UnderInquiry`, `ViewRequested`) while the session's
//! docket is published. `Judged` is never reachable here; only
//! judgment finalization sets it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, DocketEntryId, DocketStatus, DomainError, ErrorCode,
    EventEnvelope, EventId, SessionId, SessionStatus, Timestamp,
};
use crate::ports::{DocketEntryRepository, EventPublisher, MemberRegistry, SessionRepository};

/// Command to change a docket entry's status.
#[derive(Debug, Clone)]
pub struct SetCaseStatusCommand {
    pub docket_entry_id: DocketEntryId,
    pub new_status: DocketStatus,
}

/// Result of successfully changing a case status.
#[derive(Debug, Clone)]
pub struct SetCaseStatusResult {
    pub event: CaseStatusChangedEvent,
}

/// Event published when a docket entry changes status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStatusChangedEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub session_id: SessionId,
    pub new_status: DocketStatus,
    pub changed_at: Timestamp,
}

domain_event!(
    CaseStatusChangedEvent,
    event_type = "docket.status_changed",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = changed_at,
    event_id = event_id
);

/// Error type for changing a case status.
#[derive(Debug, Clone)]
pub enum SetCaseStatusError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Owning session not found (dangling entry).
    SessionNotFound(SessionId),
    /// Domain error (invalid transition, session not published).
    Domain(DomainError),
}

impl std::fmt::Display for SetCaseStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetCaseStatusError::EntryNotFound(id) => write!(f, "Docket entry not found: {}", id),
            SetCaseStatusError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            SetCaseStatusError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SetCaseStatusError {}

impl From<DomainError> for SetCaseStatusError {
    fn from(err: DomainError) -> Self {
        SetCaseStatusError::Domain(err)
    }
}

/// Handler for case status changes.
pub struct SetCaseStatusHandler {
    session_repository: Arc<dyn SessionRepository>,
    entry_repository: Arc<dyn DocketEntryRepository>,
    member_registry: Arc<dyn MemberRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SetCaseStatusHandler {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        entry_repository: Arc<dyn DocketEntryRepository>,
        member_registry: Arc<dyn MemberRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            session_repository,
            entry_repository,
            member_registry,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetCaseStatusCommand,
        metadata: CommandMetadata,
    ) -> Result<SetCaseStatusResult, SetCaseStatusError> {
        // 1. Find the entry and its session
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(SetCaseStatusError::EntryNotFound(cmd.docket_entry_id))?;

        let session = self
            .session_repository
            .find_by_id(entry.session_id())
            .await?
            .ok_or(SetCaseStatusError::SessionNotFound(*entry.session_id()))?;

        // 2. Status excursions only happen during a published session
        if session.status() != SessionStatus::DocketPublished {
            return Err(DomainError::invalid_state(
                "Case status can only change while the docket is published",
            )
            .with_detail("session_id", session.id().to_string())
            .with_detail("session_status", session.status().to_string())
            .into());
        }

        // 3. A view request must name a known member
        if let DocketStatus::ViewRequested { member_id } = &cmd.new_status {
            if self.member_registry.find_by_id(member_id).await?.is_none() {
                return Err(DomainError::new(
                    ErrorCode::MemberNotFound,
                    "View-requesting member is not on the roster",
                )
                .with_detail("member_id", member_id.to_string())
                .into());
            }
        }

        // 4. Apply (domain validates the transition and deadline)
        entry.set_status(cmd.new_status.clone())?;
        self.entry_repository.update(&entry).await?;

        // 5. Create and publish event
        let event = CaseStatusChangedEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            session_id: *entry.session_id(),
            new_status: cmd.new_status,
            changed_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(SetCaseStatusResult { event })
    }
}
