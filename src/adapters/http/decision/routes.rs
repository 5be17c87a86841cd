//! Route configuration for decision endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{create_decision, publish_decision, DecisionAppState};

/// Creates the decision router.
///
/// Routes:
/// - `POST /api/decisions` - Create a decision from a judgment
/// - `POST /api/decisions/:id/publications` - Publish a decision version
pub fn decision_router() -> Router<DecisionAppState> {
    Router::new()
        .route("/api/decisions", post(create_decision))
        .route("/api/decisions/:id/publications", post(publish_decision))
}
