//! HTTP handlers for decision endpoints.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::decision::{
    CreateDecisionCommand, CreateDecisionError, CreateDecisionHandler, PublishDecisionCommand,
    PublishDecisionError, PublishDecisionHandler,
};
use crate::domain::foundation::{DecisionId, JudgmentId};
use crate::ports::{DecisionRepository, DocketEntryRepository, EventPublisher};

use super::super::actor::Actor;
use super::super::error::ApiError;
use super::dto::{
    CreateDecisionRequest, DecisionResponse, PublicationResponse, PublishDecisionRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for decision endpoints.
#[derive(Clone)]
pub struct DecisionAppState {
    pub entry_repository: Arc<dyn DocketEntryRepository>,
    pub decision_repository: Arc<dyn DecisionRepository>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl DecisionAppState {
    fn create_decision_handler(&self) -> CreateDecisionHandler {
        CreateDecisionHandler::new(
            self.entry_repository.clone(),
            self.decision_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    fn publish_decision_handler(&self) -> PublishDecisionHandler {
        PublishDecisionHandler::new(self.decision_repository.clone(), self.event_publisher.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/decisions - Create a decision from a judgment
pub async fn create_decision(
    State(state): State<DecisionAppState>,
    actor: Actor,
    Json(request): Json<CreateDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let judgment_id: JudgmentId = request
        .judgment_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid judgment ID format"))?;

    let result = state
        .create_decision_handler()
        .handle(
            CreateDecisionCommand {
                judgment_id,
                ementa_title: request.ementa_title,
                ementa_body: request.ementa_body,
                vote_path: request.vote_path,
            },
            actor.metadata(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(DecisionResponse::from(&result.decision))))
}

/// POST /api/decisions/:id/publications - Publish a decision version
pub async fn publish_decision(
    State(state): State<DecisionAppState>,
    Path(decision_id): Path<String>,
    actor: Actor,
    Json(request): Json<PublishDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let decision_id: DecisionId = decision_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid decision ID format"))?;

    let result = state
        .publish_decision_handler()
        .handle(
            PublishDecisionCommand {
                decision_id,
                publication_number: request.publication_number,
                publication_date: request.publication_date,
                republish_reason: request.republish_reason,
            },
            actor.metadata(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PublicationResponse::from(&result.publication)),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<CreateDecisionError> for ApiError {
    fn from(err: CreateDecisionError) -> Self {
        match err {
            CreateDecisionError::JudgmentNotFound(id) => {
                ApiError::not_found(format!("Judgment not found: {}", id))
            }
            CreateDecisionError::Domain(e) => e.into(),
        }
    }
}

impl From<PublishDecisionError> for ApiError {
    fn from(err: PublishDecisionError) -> Self {
        match err {
            PublishDecisionError::DecisionNotFound(id) => {
                ApiError::not_found(format!("Decision not found: {}", id))
            }
            PublishDecisionError::Domain(e) => e.into(),
        }
    }
}
