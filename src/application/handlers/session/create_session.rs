//! CreateSessionHandler - command handler for opening a new session.
//!
//! A new session starts in `AwaitingPublication` with an empty docket.
//! Its ordinal within the year is allocated by the repository, so two
//! concurrent creations cannot share a number.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, DomainError, EventEnvelope, EventId, MemberId, SessionId,
    Timestamp,
};
use crate::domain::session::Session;
use crate::ports::{EventPublisher, MemberRegistry, SessionRepository};

/// Command to open a new session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    /// Year the session ordinal is scoped to.
    pub year: i32,
    /// Date of the hearing.
    pub session_date: NaiveDate,
    /// Participating board members.
    pub member_ids: Vec<MemberId>,
    /// Optional administrative notes.
    pub notes: Option<String>,
}

/// Result of successfully creating a session.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    pub session: Session,
    pub event: SessionCreatedEvent,
}

/// Event published when a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreatedEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub ordinal: u32,
    pub year: i32,
    pub created_at: Timestamp,
}

domain_event!(
    SessionCreatedEvent,
    event_type = "session.created",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = created_at,
    event_id = event_id
);

/// Error type for creating a session.
#[derive(Debug, Clone)]
pub enum CreateSessionError {
    /// One or more members are unknown or inactive.
    UnknownMembers(Vec<MemberId>),
    /// Domain error (validation, persistence conflict).
    Domain(DomainError),
}

impl std::fmt::Display for CreateSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateSessionError::UnknownMembers(ids) => {
                write!(f, "Unknown or inactive members: {:?}", ids)
            }
            CreateSessionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateSessionError {}

impl From<DomainError> for CreateSessionError {
    fn from(err: DomainError) -> Self {
        CreateSessionError::Domain(err)
    }
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    session_repository: Arc<dyn SessionRepository>,
    member_registry: Arc<dyn MemberRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateSessionHandler {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        member_registry: Arc<dyn MemberRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            session_repository,
            member_registry,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateSessionResult, CreateSessionError> {
        // 1. Validate the panel against the roster
        let failed = self
            .member_registry
            .missing_or_inactive(&cmd.member_ids)
            .await?;
        if !failed.is_empty() {
            return Err(CreateSessionError::UnknownMembers(failed));
        }

        // 2. Allocate the ordinal and build the aggregate
        let ordinal = self.session_repository.next_ordinal(cmd.year).await?;
        let mut session = Session::new(SessionId::new(), ordinal, cmd.year, cmd.session_date);
        session.set_members(cmd.member_ids)?;
        if cmd.notes.is_some() {
            session.set_notes(cmd.notes);
        }

        // 3. Persist
        self.session_repository.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            ordinal,
            year = cmd.year,
            "session created"
        );

        // 4. Create and publish event
        let event = SessionCreatedEvent {
            event_id: EventId::new(),
            session_id: *session.id(),
            ordinal,
            year: cmd.year,
            created_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(CreateSessionResult { session, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryEventBus, InMemoryMemberRegistry, InMemorySessionRepository,
    };
    use crate::domain::foundation::SessionStatus;

    fn hearing_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    struct Fixture {
        sessions: Arc<InMemorySessionRepository>,
        members: Arc<InMemoryMemberRegistry>,
        bus: Arc<InMemoryEventBus>,
        handler: CreateSessionHandler,
    }

    fn fixture() -> Fixture {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let members = Arc::new(InMemoryMemberRegistry::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler =
            CreateSessionHandler::new(sessions.clone(), members.clone(), bus.clone());
        Fixture {
            sessions,
            members,
            bus,
            handler,
        }
    }

    #[tokio::test]
    async fn creates_session_awaiting_publication() {
        let f = fixture();
        let chair = f.members.register("Dr. Silva", true);

        let result = f
            .handler
            .handle(
                CreateSessionCommand {
                    year: 2026,
                    session_date: hearing_date(),
                    member_ids: vec![chair],
                    notes: Some("extraordinary session".to_string()),
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(result.session.status(), SessionStatus::AwaitingPublication);
        assert_eq!(result.session.ordinal(), 1);
        assert_eq!(result.session.member_ids(), &[chair]);
        assert!(f
            .sessions
            .find_by_id(result.session.id())
            .await
            .unwrap()
            .is_some());
        assert!(f.bus.has_event("session.created"));
    }

    #[tokio::test]
    async fn ordinals_increase_within_the_year() {
        let f = fixture();

        for expected in 1..=3 {
            let result = f
                .handler
                .handle(
                    CreateSessionCommand {
                        year: 2026,
                        session_date: hearing_date(),
                        member_ids: vec![],
                        notes: None,
                    },
                    CommandMetadata::test_fixture(),
                )
                .await
                .unwrap();
            assert_eq!(result.session.ordinal(), expected);
        }
    }

    #[tokio::test]
    async fn rejects_unknown_members() {
        let f = fixture();
        let ghost = MemberId::new();

        let err = f
            .handler
            .handle(
                CreateSessionCommand {
                    year: 2026,
                    session_date: hearing_date(),
                    member_ids: vec![ghost],
                    notes: None,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            CreateSessionError::UnknownMembers(ids) => assert_eq!(ids, vec![ghost]),
            other => panic!("expected UnknownMembers, got {}", other),
        }
        assert_eq!(f.bus.event_count(), 0);
    }
}
