//! HTTP handlers for session endpoints.
//!
//! Connect Axum routes to the session command handlers: creation,
//! docket assembly, docket publication, conclusion, cancellation.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::session::{
    AddCaseCommand, AddCaseError, AddCaseHandler, CancelSessionCommand, CancelSessionError,
    CancelSessionHandler, ConcludeSessionCommand, ConcludeSessionError, ConcludeSessionHandler,
    CreateSessionCommand, CreateSessionError, CreateSessionHandler, PublishDocketCommand,
    PublishDocketError, PublishDocketHandler, RemoveCaseCommand, RemoveCaseError,
    RemoveCaseHandler,
};
use crate::domain::foundation::{CaseId, DocketEntryId, MemberId, SessionId};
use crate::ports::{DocketEntryRepository, EventPublisher, MemberRegistry, SessionRepository};

use super::super::actor::Actor;
use super::super::error::ApiError;
use super::dto::{
    AddCaseRequest, CancelSessionRequest, CaseAddedResponse, CreateSessionRequest,
    PublishDocketRequest, SessionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for session endpoints.
#[derive(Clone)]
pub struct SessionAppState {
    pub session_repository: Arc<dyn SessionRepository>,
    pub entry_repository: Arc<dyn DocketEntryRepository>,
    pub member_registry: Arc<dyn MemberRegistry>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl SessionAppState {
    fn create_session_handler(&self) -> CreateSessionHandler {
        CreateSessionHandler::new(
            self.session_repository.clone(),
            self.member_registry.clone(),
            self.event_publisher.clone(),
        )
    }

    fn add_case_handler(&self) -> AddCaseHandler {
        AddCaseHandler::new(
            self.session_repository.clone(),
            self.entry_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    fn remove_case_handler(&self) -> RemoveCaseHandler {
        RemoveCaseHandler::new(
            self.session_repository.clone(),
            self.entry_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    fn publish_docket_handler(&self) -> PublishDocketHandler {
        PublishDocketHandler::new(self.session_repository.clone(), self.event_publisher.clone())
    }

    fn conclude_session_handler(&self) -> ConcludeSessionHandler {
        ConcludeSessionHandler::new(
            self.session_repository.clone(),
            self.entry_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    fn cancel_session_handler(&self) -> CancelSessionHandler {
        CancelSessionHandler::new(self.session_repository.clone(), self.event_publisher.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/sessions - Create a session
pub async fn create_session(
    State(state): State<SessionAppState>,
    actor: Actor,
    Json(request): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let member_ids = request
        .member_ids
        .iter()
        .map(|s| s.parse::<MemberId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ApiError::bad_request("Invalid member ID format"))?;

    let result = state
        .create_session_handler()
        .handle(
            CreateSessionCommand {
                year: request.year,
                session_date: request.session_date,
                member_ids,
                notes: request.notes,
            },
            actor.metadata(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(&result.session))))
}

/// POST /api/sessions/:id/cases - Add a case to the docket
pub async fn add_case(
    State(state): State<SessionAppState>,
    Path(session_id): Path<String>,
    actor: Actor,
    Json(request): Json<AddCaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid session ID format"))?;
    let case_id: CaseId = request
        .case_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid case ID format"))?;

    let result = state
        .add_case_handler()
        .handle(AddCaseCommand { session_id, case_id }, actor.metadata())
        .await?;

    let response = CaseAddedResponse {
        docket_entry_id: result.entry.id().to_string(),
        position: result.entry.position(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// DELETE /api/docket-entries/:id - Remove a case from the docket
pub async fn remove_case(
    State(state): State<SessionAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id: DocketEntryId = entry_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid docket entry ID format"))?;

    state
        .remove_case_handler()
        .handle(RemoveCaseCommand { docket_entry_id }, actor.metadata())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/publish-docket - Publish the docket
pub async fn publish_docket(
    State(state): State<SessionAppState>,
    Path(session_id): Path<String>,
    actor: Actor,
    Json(request): Json<PublishDocketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid session ID format"))?;

    let result = state
        .publish_docket_handler()
        .handle(
            PublishDocketCommand {
                session_id,
                publication_number: request.publication_number,
                publication_date: request.publication_date,
            },
            actor.metadata(),
        )
        .await?;

    Ok(Json(SessionResponse::from(&result.session)))
}

/// POST /api/sessions/:id/conclude - Conclude the session
pub async fn conclude_session(
    State(state): State<SessionAppState>,
    Path(session_id): Path<String>,
    actor: Actor,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid session ID format"))?;

    let result = state
        .conclude_session_handler()
        .handle(ConcludeSessionCommand { session_id }, actor.metadata())
        .await?;

    Ok(Json(SessionResponse::from(&result.session)))
}

/// POST /api/sessions/:id/cancel - Cancel the session
pub async fn cancel_session(
    State(state): State<SessionAppState>,
    Path(session_id): Path<String>,
    actor: Actor,
    Json(request): Json<CancelSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid session ID format"))?;

    let result = state
        .cancel_session_handler()
        .handle(
            CancelSessionCommand {
                session_id,
                reason: request.reason,
            },
            actor.metadata(),
        )
        .await?;

    Ok(Json(SessionResponse::from(&result.session)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<CreateSessionError> for ApiError {
    fn from(err: CreateSessionError) -> Self {
        match err {
            CreateSessionError::UnknownMembers(ids) => ApiError::bad_request(format!(
                "Unknown or inactive members: {}",
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
            )),
            CreateSessionError::Domain(e) => e.into(),
        }
    }
}

impl From<AddCaseError> for ApiError {
    fn from(err: AddCaseError) -> Self {
        match err {
            AddCaseError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            AddCaseError::Domain(e) => e.into(),
        }
    }
}

impl From<RemoveCaseError> for ApiError {
    fn from(err: RemoveCaseError) -> Self {
        match err {
            RemoveCaseError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            RemoveCaseError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            RemoveCaseError::Domain(e) => e.into(),
        }
    }
}

impl From<PublishDocketError> for ApiError {
    fn from(err: PublishDocketError) -> Self {
        match err {
            PublishDocketError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            PublishDocketError::Domain(e) => e.into(),
        }
    }
}

impl From<ConcludeSessionError> for ApiError {
    fn from(err: ConcludeSessionError) -> Self {
        match err {
            ConcludeSessionError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            ConcludeSessionError::Domain(e) => e.into(),
        }
    }
}

impl From<CancelSessionError> for ApiError {
    fn from(err: CancelSessionError) -> Self {
        match err {
            CancelSessionError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            CancelSessionError::Domain(e) => e.into(),
        }
    }
}
