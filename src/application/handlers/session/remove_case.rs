//! RemoveCaseHandler - command handler for taking a case off a docket.
//!
//! Removal deletes the docket entry without renumbering the remaining
//! positions; a docket may legitimately show positions 1, 3, 4.
//! Judged entries are never removed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CaseId, CommandMetadata, DocketEntryId, DomainError, EventEnvelope, EventId,
    SessionId, Timestamp,
};
use crate::ports::{DocketEntryRepository, EventPublisher, SessionRepository};

/// Command to remove a case from its docket.
#[derive(Debug, Clone)]
pub struct RemoveCaseCommand {
    pub docket_entry_id: DocketEntryId,
}

/// Result of successfully removing a case.
#[derive(Debug, Clone)]
pub struct RemoveCaseResult {
    pub event: CaseRemovedEvent,
}

/// Event published when a case leaves a docket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRemovedEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub docket_entry_id: DocketEntryId,
    pub case_id: CaseId,
    pub removed_at: Timestamp,
}

domain_event!(
    CaseRemovedEvent,
    event_type = "session.case_removed",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = removed_at,
    event_id = event_id
);

/// Error type for removing a case.
#[derive(Debug, Clone)]
pub enum RemoveCaseError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Owning session not found (dangling entry).
    SessionNotFound(SessionId),
    /// Domain error (entry judged, session not editable).
    Domain(DomainError),
}

impl std::fmt::Display for RemoveCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveCaseError::EntryNotFound(id) => write!(f, "Docket entry not found: {}", id),
            RemoveCaseError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            RemoveCaseError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RemoveCaseError {}

impl From<DomainError> for RemoveCaseError {
    fn from(err: DomainError) -> Self {
        RemoveCaseError::Domain(err)
    }
}

/// Handler for removing cases from dockets.
pub struct RemoveCaseHandler {
    session_repository: Arc<dyn SessionRepository>,
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RemoveCaseHandler {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        entry_repository: Arc<dyn DocketEntryRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            session_repository,
            entry_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RemoveCaseCommand,
        metadata: CommandMetadata,
    ) -> Result<RemoveCaseResult, RemoveCaseError> {
        // 1. Find the entry and its session
        let entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(RemoveCaseError::EntryNotFound(cmd.docket_entry_id))?;

        if entry.is_judged() {
            return Err(DomainError::invalid_state("Cannot remove a judged case")
                .with_detail("docket_entry_id", entry.id().to_string())
                .into());
        }

        let mut session = self
            .session_repository
            .find_by_id(entry.session_id())
            .await?
            .ok_or(RemoveCaseError::SessionNotFound(*entry.session_id()))?;

        // 2. Unregister from the session (validates editability)
        session.remove_entry(entry.id())?;

        // 3. Persist: version-guarded session update first, then delete
        self.session_repository.update(&session).await?;
        self.entry_repository.delete(entry.id()).await?;

        // 4. Create and publish event
        let event = CaseRemovedEvent {
            event_id: EventId::new(),
            session_id: *entry.session_id(),
            docket_entry_id: cmd.docket_entry_id,
            case_id: *entry.case_id(),
            removed_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(RemoveCaseResult { event })
    }
}
