//! PublishDecisionHandler - command handler for publication.
//!
//! Appends one version to the decision's publication history. The
//! first publication carries no republish reason; every later one
//! must. History is append-only and orders are gapless.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::decision::Publication;
use crate::domain::foundation::{
    domain_event, CommandMetadata, DecisionId, DomainError, EventEnvelope, EventId, Timestamp,
};
use crate::ports::{DecisionRepository, EventPublisher};

/// Command to publish (or republish) a decision.
#[derive(Debug, Clone)]
pub struct PublishDecisionCommand {
    pub decision_id: DecisionId,
    pub publication_number: String,
    pub publication_date: NaiveDate,
    /// Required from the second publication on, forbidden on the first.
    pub republish_reason: Option<String>,
}

/// Result of successfully publishing a decision.
#[derive(Debug, Clone)]
pub struct PublishDecisionResult {
    pub publication: Publication,
    pub event: DecisionPublishedEvent,
}

/// Event published when a decision version goes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPublishedEvent {
    pub event_id: EventId,
    pub decision_id: DecisionId,
    pub order: u32,
    pub publication_number: String,
    pub is_republication: bool,
    pub published_at: Timestamp,
}

domain_event!(
    DecisionPublishedEvent,
    event_type = "decision.published",
    aggregate_id = decision_id,
    aggregate_type = "Decision",
    occurred_at = published_at,
    event_id = event_id
);

/// Error type for publishing a decision.
#[derive(Debug, Clone)]
pub enum PublishDecisionError {
    /// Decision not found.
    DecisionNotFound(DecisionId),
    /// Domain error (republish reason invariants, validation,
    /// concurrent publication).
    Domain(DomainError),
}

impl std::fmt::Display for PublishDecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishDecisionError::DecisionNotFound(id) => {
                write!(f, "Decision not found: {}", id)
            }
            PublishDecisionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PublishDecisionError {}

impl From<DomainError> for PublishDecisionError {
    fn from(err: DomainError) -> Self {
        PublishDecisionError::Domain(err)
    }
}

/// Handler for publishing decisions.
pub struct PublishDecisionHandler {
    decision_repository: Arc<dyn DecisionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PublishDecisionHandler {
    pub fn new(
        decision_repository: Arc<dyn DecisionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            decision_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PublishDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<PublishDecisionResult, PublishDecisionError> {
        // 1. Find the decision
        let mut decision = self
            .decision_repository
            .find_by_id(&cmd.decision_id)
            .await?
            .ok_or(PublishDecisionError::DecisionNotFound(cmd.decision_id))?;

        // 2. Append the publication (domain checks the reason rules)
        let publication = decision
            .publish(
                cmd.publication_number.clone(),
                cmd.publication_date,
                cmd.republish_reason,
            )?
            .clone();

        // 3. The version guard turns a concurrent publication of the
        //    same decision into a Conflict instead of a skipped order
        self.decision_repository.update(&decision).await?;

        tracing::info!(
            decision_id = %cmd.decision_id,
            order = publication.order(),
            publication_number = %publication.publication_number(),
            "decision published"
        );

        // 4. Create and publish event
        let event = DecisionPublishedEvent {
            event_id: EventId::new(),
            decision_id: cmd.decision_id,
            order: publication.order(),
            publication_number: publication.publication_number().to_string(),
            is_republication: !publication.is_original(),
            published_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(PublishDecisionResult { publication, event })
    }
}
