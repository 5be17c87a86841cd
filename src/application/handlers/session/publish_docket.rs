//! PublishDocketHandler - command handler for publishing a docket.
//!
//! Publication fixes the official publication number and date and
//! moves the session to `DocketPublished`, after which case statuses
//! may change and votes may be cast.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CommandMetadata, DomainError, EventEnvelope, EventId, SessionId, Timestamp,
    ValidationError,
};
use crate::domain::session::Session;
use crate::ports::{EventPublisher, SessionRepository};

/// Command to publish a session's docket.
#[derive(Debug, Clone)]
pub struct PublishDocketCommand {
    pub session_id: SessionId,
    pub publication_number: String,
    pub publication_date: NaiveDate,
}

/// Result of successfully publishing a docket.
#[derive(Debug, Clone)]
pub struct PublishDocketResult {
    pub session: Session,
    pub event: DocketPublishedEvent,
}

/// Event published when a docket goes official.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocketPublishedEvent {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub publication_number: String,
    pub publication_date: NaiveDate,
    pub published_at: Timestamp,
}

domain_event!(
    DocketPublishedEvent,
    event_type = "session.docket_published",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = published_at,
    event_id = event_id
);

/// Error type for publishing a docket.
#[derive(Debug, Clone)]
pub enum PublishDocketError {
    /// Session not found.
    SessionNotFound(SessionId),
    /// Domain error (already published, concluded, invalid input).
    Domain(DomainError),
}

impl std::fmt::Display for PublishDocketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishDocketError::SessionNotFound(id) => write!(f, "Session not found: {}", id),
            PublishDocketError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PublishDocketError {}

impl From<DomainError> for PublishDocketError {
    fn from(err: DomainError) -> Self {
        PublishDocketError::Domain(err)
    }
}

/// Handler for publishing dockets.
pub struct PublishDocketHandler {
    session_repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PublishDocketHandler {
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
        cmd: PublishDocketCommand,
        metadata: CommandMetadata,
    ) -> Result<PublishDocketResult, PublishDocketError> {
        if cmd.publication_number.trim().is_empty() {
            return Err(DomainError::from(ValidationError::empty_field("publication_number")).into());
        }

        // 1. Find the session
        let mut session = self
            .session_repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(PublishDocketError::SessionNotFound(cmd.session_id))?;

        // 2. Publish (domain validates the status)
        session.publish_docket(cmd.publication_number.clone(), cmd.publication_date)?;

        // 3. Persist
        self.session_repository.update(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            publication_number = %cmd.publication_number,
            "docket published"
        );

        // 4. Create and publish event
        let event = DocketPublishedEvent {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            publication_number: cmd.publication_number,
            publication_date: cmd.publication_date,
            published_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(PublishDocketResult { session, event })
    }
}
