//! Route configuration for session endpoints.

use axum::routing::{delete, post};
use axum::Router;

use super::handlers::{
    add_case, cancel_session, conclude_session, create_session, publish_docket, remove_case,
    SessionAppState,
};

/// Creates the session router.
///
/// Routes:
/// - `POST /api/sessions` - Create a session
/// - `POST /api/sessions/:id/cases` - Add a case to the docket
/// - `DELETE /api/docket-entries/:id` - Remove a case from the docket
/// - `POST /api/sessions/:id/publish-docket` - Publish the docket
/// - `POST /api/sessions/:id/conclude` - Conclude the session
/// - `POST /api/sessions/:id/cancel` - Cancel the session
pub fn session_router() -> Router<SessionAppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id/cases", post(add_case))
        .route("/api/docket-entries/:id", delete(remove_case))
        .route("/api/sessions/:id/publish-docket", post(publish_docket))
        .route("/api/sessions/:id/conclude", post(conclude_session))
        .route("/api/sessions/:id/cancel", post(cancel_session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryDocketEntryRepository, InMemoryEventBus, InMemoryMemberRegistry,
        InMemorySessionRepository,
    };
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> (SessionAppState, Arc<InMemoryMemberRegistry>) {
        let members = Arc::new(InMemoryMemberRegistry::new());
        let state = SessionAppState {
            session_repository: Arc::new(InMemorySessionRepository::new()),
            entry_repository: Arc::new(InMemoryDocketEntryRepository::new()),
            member_registry: members.clone(),
            event_publisher: Arc::new(InMemoryEventBus::new()),
        };
        (state, members)
    }

    #[tokio::test]
    async fn create_session_endpoint_returns_201() {
        let (state, members) = test_state();
        let member_id = members.register("Justice A", true);
        let app = session_router().with_state(state);

        let body = format!(
            r#"{{"year": 2026, "session_date": "2026-03-09", "member_ids": ["{}"]}}"#,
            member_id
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sessions")
                    .header("content-type", "application/json")
                    .header("X-Actor-Id", "clerk-1")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn missing_actor_header_returns_401() {
        let (state, _) = test_state();
        let app = session_router().with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sessions")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"year": 2026, "session_date": "2026-03-09", "member_ids": []}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
