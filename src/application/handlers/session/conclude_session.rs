//! ConcludeSessionHandler - command handler for closing a session.
//!
//! Conclusion requires a non-empty docket with every entry judged.
//! The check runs against the entry store and is protected against a
//! concurrent status change by the session's version guard: any
//! operation that touches the docket also bumps the session version,
//! so a stale conclusion fails with `Conflict` at commit time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, DomainError, EventEnvelope, EventId, SessionId, Timestamp,
};
use crate::domain::session::Session;
use crate::ports::{DocketEntryRepository, EventPublisher, SessionRepository};

/// Command to conclude a session.
#[derive(Debug, Clone)]
pub struct ConcludeSessionCommand {
    pub session_id: SessionId,
}

/// Result of successfully concluding a session.
#[derive(Debug, Clone)]
pub struct ConcludeSessionResult {
    pub session: Session,
    pub event: SessionConcludedEvent,
}

/// Event published when a session concludes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConcludedEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub judged_entries: u32,
    pub concluded_at: Timestamp,
}

domain_event!(
    SessionConcludedEvent,
    event_type = "session.concluded",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = concluded_at,
    event_id = event_id
);

/// Error type for concluding a session.
#[derive(Debug, Clone)]
pub enum ConcludeSessionError {
    /// Session not found.
    SessionNotFound(SessionId),
    /// Domain error (unjudged entries, empty docket, wrong status).
    Domain(DomainError),
}

impl std::fmt::Display for ConcludeSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcludeSessionError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            ConcludeSessionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConcludeSessionError {}

impl From<DomainError> for ConcludeSessionError {
    fn from(err: DomainError) -> Self {
        ConcludeSessionError::Domain(err)
    }
}

/// Handler for concluding sessions.
pub struct ConcludeSessionHandler {
    session_repository: Arc<dyn SessionRepository>,
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ConcludeSessionHandler {
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
        cmd: ConcludeSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<ConcludeSessionResult, ConcludeSessionError> {
        // 1. Find the session
        let mut session = self
            .session_repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(ConcludeSessionError::SessionNotFound(cmd.session_id))?;

        // 2. Every docketed case must be judged
        let entries = self.entry_repository.find_by_session(&cmd.session_id).await?;
        if entries.is_empty() {
            return Err(
                DomainError::precondition("Cannot conclude a session with an empty docket")
                    .with_detail("session_id", cmd.session_id.to_string())
                    .into(),
            );
        }
        let unjudged: Vec<String> = entries
            .iter()
            .filter(|e| !e.is_judged())
            .map(|e| e.id().to_string())
            .collect();
        if !unjudged.is_empty() {
            return Err(DomainError::precondition(
                "All docketed cases must be judged before the session concludes",
            )
            .with_detail("session_id", cmd.session_id.to_string())
            .with_detail("unjudged_entry_ids", unjudged.join(","))
            .into());
        }

        // 3. Conclude and persist under the version guard
        session.conclude()?;
        self.session_repository.update(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            judged_entries = entries.len(),
            "session concluded"
        );

        // 4. Create and publish event
        let event = SessionConcludedEvent {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            judged_entries: entries.len() as u32,
            concluded_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(ConcludeSessionResult { session, event })
    }
}
