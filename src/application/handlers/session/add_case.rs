//! AddCaseHandler - command handler for placing a case on a docket.
//!
//! Allowed while the session is `AwaitingPublication` or
//! `DocketPublished`. The docket position comes from the session's own
//! counter, inside the same version-guarded update that registers the
//! entry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::DocketEntry;
use crate::domain::foundation::{
    domain_event, CaseId, CommandMetadata, DocketEntryId, DomainError, EventEnvelope, EventId,
    SessionId, Timestamp,
};
use crate::ports::{DocketEntryRepository, EventPublisher, SessionRepository};

/// Command to add a case to a session's docket.
#[derive(Debug, Clone)]
pub struct AddCaseCommand {
    pub session_id: SessionId,
    pub case_id: CaseId,
}

/// Result of successfully adding a case.
#[derive(Debug, Clone)]
pub struct AddCaseResult {
    pub entry: DocketEntry,
    pub event: CaseAddedEvent,
}

/// Event published when a case lands on a docket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseAddedEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub docket_entry_id: DocketEntryId,
    pub case_id: CaseId,
    pub position: u32,
    pub added_at: Timestamp,
}

domain_event!(
    CaseAddedEvent,
    event_type = "session.case_added",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = added_at,
    event_id = event_id
);

/// Error type for adding a case.
#[derive(Debug, Clone)]
pub enum AddCaseError {
    /// Session not found.
    SessionNotFound(SessionId),
    /// Domain error (session not editable, duplicate case, conflict).
    Domain(DomainError),
}

impl std::fmt::Display for AddCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddCaseError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            AddCaseError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AddCaseError {}

impl From<DomainError> for AddCaseError {
    fn from(err: DomainError) -> Self {
        AddCaseError::Domain(err)
    }
}

/// Handler for adding cases to dockets.
pub struct AddCaseHandler {
    session_repository: Arc<dyn SessionRepository>,
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AddCaseHandler {
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
        cmd: AddCaseCommand,
        metadata: CommandMetadata,
    ) -> Result<AddCaseResult, AddCaseError> {
        // 1. Find the session
        let mut session = self
            .session_repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(AddCaseError::SessionNotFound(cmd.session_id))?;

        // 2. Reject a case already docketed in this session
        if let Some(existing) = self
            .entry_repository
            .find_by_session_and_case(&cmd.session_id, &cmd.case_id)
            .await?
        {
            return Err(DomainError::conflict("Case is already on this docket")
                .with_detail("session_id", cmd.session_id.to_string())
                .with_detail("docket_entry_id", existing.id().to_string())
                .into());
        }

        // 3. Allocate the position and register the entry
        let entry_id = DocketEntryId::new();
        let position = session.add_entry(entry_id)?;
        let entry = DocketEntry::new(entry_id, cmd.session_id, cmd.case_id, position);

        // 4. Persist: the session update carries the version guard, so
        //    a concurrent add loses before the entry row is written
        self.session_repository.update(&session).await?;
        self.entry_repository.save(&entry).await?;

        // 5. Create and publish event
        let event = CaseAddedEvent {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            docket_entry_id: entry_id,
            case_id: cmd.case_id,
            position,
            added_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(AddCaseResult { entry, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryDocketEntryRepository, InMemoryEventBus, InMemorySessionRepository,
    };
    use crate::domain::foundation::{DocketStatus, ErrorCode};
    use crate::domain::session::Session;
    use chrono::NaiveDate;

    struct Fixture {
        sessions: Arc<InMemorySessionRepository>,
        entries: Arc<InMemoryDocketEntryRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: AddCaseHandler,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = AddCaseHandler::new(sessions.clone(), entries.clone(), bus.clone());
        Fixture {
            sessions,
            entries,
            bus,
            handler,
        }
    }

    async fn seed_session(f: &Fixture) -> SessionId {
        let session = Session::new(
            SessionId::new(),
            1,
            2026,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        );
        let id = *session.id();
        f.sessions.save(&session).await.unwrap();
        id
    }

    #[tokio::test]
    async fn adds_case_with_sequential_positions() {
        let f = fixture();
        let session_id = seed_session(&f).await;

        let first = f
            .handler
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id: CaseId::new(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
        let second = f
            .handler
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id: CaseId::new(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(first.entry.position(), 1);
        assert_eq!(second.entry.position(), 2);
        assert_eq!(first.entry.status(), &DocketStatus::OnDocket);
        assert_eq!(f.bus.events_of_type("session.case_added").len(), 2);

        let session = f.sessions.find_by_id(&session_id).await.unwrap().unwrap();
        assert_eq!(session.entry_count(), 2);
    }

    #[tokio::test]
    async fn rejects_case_already_on_docket() {
        let f = fixture();
        let session_id = seed_session(&f).await;
        let case_id = CaseId::new();

        f.handler
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let err = f
            .handler
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            AddCaseError::Domain(err) => assert_eq!(err.code, ErrorCode::Conflict),
            other => panic!("expected Conflict, got {}", other),
        }
    }

    #[tokio::test]
    async fn rejects_concluded_session() {
        let f = fixture();
        let mut session = Session::new(
            SessionId::new(),
            1,
            2026,
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        );
        session
            .publish_docket("DO-55".to_string(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
            .unwrap();
        session.conclude().unwrap();
        let session_id = *session.id();
        f.sessions.save(&session).await.unwrap();

        let err = f
            .handler
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id: CaseId::new(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            AddCaseError::Domain(err) => assert_eq!(err.code, ErrorCode::InvalidState),
            other => panic!("expected InvalidState, got {}", other),
        }
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn missing_session_is_reported() {
        let f = fixture();
        let err = f
            .handler
            .handle(
                AddCaseCommand {
                    session_id: SessionId::new(),
                    case_id: CaseId::new(),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AddCaseError::SessionNotFound(_)));
    }
}
