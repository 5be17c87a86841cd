//! Actor context extracted from request headers.
//!
//! Authentication lives in front of this service; requests arrive
//! with the acting operator already resolved into the `X-Actor-Id`
//! header. The optional `X-Correlation-Id` header links the command
//! and its events back to the originating request.

use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::domain::foundation::CommandMetadata;

use super::error::ErrorResponse;

/// Acting operator extracted from the request.
#[derive(Debug, Clone)]
pub struct Actor {
    actor_id: String,
    correlation_id: Option<String>,
}

impl Actor {
    /// Builds the command metadata for this request.
    pub fn metadata(&self) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.actor_id.clone());
        match &self.correlation_id {
            Some(id) => metadata.with_correlation_id(id.clone()),
            None => metadata,
        }
    }
}

/// Rejection when the actor header is missing or empty.
pub struct ActorRequired;

impl IntoResponse for ActorRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse {
            code: "ACTOR_REQUIRED".to_string(),
            message: "The X-Actor-Id header is required".to_string(),
            details: None,
        };
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ActorRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let actor_id = parts
                .headers
                .get("X-Actor-Id")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(ActorRequired)?
                .to_string();

            let correlation_id = parts
                .headers
                .get("X-Correlation-Id")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            Ok(Actor {
                actor_id,
                correlation_id,
            })
        })
    }
}
