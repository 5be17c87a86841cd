//! CancelSessionHandler - command handler for cancelling a session.
//!
//! Cancellation is allowed from any non-terminal status; docket
//! entries stay in place for the record but the session accepts no
//! further operations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, DomainError, EventEnvelope, EventId, SessionId, Timestamp,
};
use crate::domain::session::Session;
use crate::ports::{EventPublisher, SessionRepository};

/// Command to cancel a session.
#[derive(Debug, Clone)]
pub struct CancelSessionCommand {
    pub session_id: SessionId,
    /// Reason recorded in the session notes.
    pub reason: Option<String>,
}

/// Result of successfully cancelling a session.
#[derive(Debug, Clone)]
pub struct CancelSessionResult {
    pub session: Session,
    pub event: SessionCancelledEvent,
}

/// Event published when a session is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelledEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub cancelled_at: Timestamp,
}

domain_event!(
    SessionCancelledEvent,
    event_type = "session.cancelled",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = cancelled_at,
    event_id = event_id
);

/// Error type for cancelling a session.
#[derive(Debug, Clone)]
pub enum CancelSessionError {
    /// Session not found.
    SessionNotFound(SessionId),
    /// Domain error (already terminal).
    Domain(DomainError),
}

impl std::fmt::Display for CancelSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelSessionError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            CancelSessionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CancelSessionError {}

impl From<DomainError> for CancelSessionError {
    fn from(err: DomainError) -> Self {
        CancelSessionError::Domain(err)
    }
}

/// Handler for cancelling sessions.
pub struct CancelSessionHandler {
    session_repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelSessionHandler {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            session_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<CancelSessionResult, CancelSessionError> {
        let mut session = self
            .session_repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(CancelSessionError::SessionNotFound(cmd.session_id))?;

        session.cancel()?;
        if let Some(reason) = cmd.reason {
            session.set_notes(Some(reason));
        }
        self.session_repository.update(&session).await?;

        tracing::info!(session_id = %session.id(), "session cancelled");

        let event = SessionCancelledEvent {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            cancelled_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(CancelSessionResult { session, event })
    }
}
