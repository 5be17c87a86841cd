//! Route configuration for docket-entry endpoints.

use axum::routing::{post, put};
use axum::Router;

use super::handlers::{
    cast_vote, complete_voting, finalize_judgment, group_votes, set_case_status, supersede_vote,
    DocketAppState,
};

/// Creates the docket-entry router.
///
/// Routes:
/// - `PUT /api/docket-entries/:id/status` - Change the case status
/// - `POST /api/docket-entries/:id/votes` - Cast a vote
/// - `POST /api/docket-entries/:id/votes/supersede` - Replace a member's vote
/// - `POST /api/docket-entries/:id/group-votes` - Run a grouping pass
/// - `POST /api/docket-entries/:id/votings/:voting_id/complete` - Record the outcome
/// - `POST /api/docket-entries/:id/judgment` - Finalize the judgment
pub fn docket_router() -> Router<DocketAppState> {
    Router::new()
        .route("/api/docket-entries/:id/status", put(set_case_status))
        .route("/api/docket-entries/:id/votes", post(cast_vote))
        .route("/api/docket-entries/:id/votes/supersede", post(supersede_vote))
        .route("/api/docket-entries/:id/group-votes", post(group_votes))
        .route(
            "/api/docket-entries/:id/votings/:voting_id/complete",
            post(complete_voting),
        )
        .route("/api/docket-entries/:id/judgment", post(finalize_judgment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryDecisionTextRegistry, InMemoryDocketEntryRepository, InMemoryEventBus,
        InMemoryMemberRegistry, InMemorySessionRepository,
    };
    use crate::domain::docket::{DocketEntry, KnowledgeType};
    use crate::domain::foundation::{CaseId, DocketEntryId, SessionId};
    use crate::ports::DocketEntryRepository;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct Fixture {
        entries: Arc<InMemoryDocketEntryRepository>,
        members: Arc<InMemoryMemberRegistry>,
        texts: Arc<InMemoryDecisionTextRegistry>,
        state: DocketAppState,
    }

    fn fixture() -> Fixture {
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let members = Arc::new(InMemoryMemberRegistry::new());
        let texts = Arc::new(InMemoryDecisionTextRegistry::new());
        let state = DocketAppState {
            session_repository: Arc::new(InMemorySessionRepository::new()),
            entry_repository: entries.clone(),
            member_registry: members.clone(),
            text_registry: texts.clone(),
            event_publisher: Arc::new(InMemoryEventBus::new()),
        };
        Fixture {
            entries,
            members,
            texts,
            state,
        }
    }

    #[tokio::test]
    async fn cast_vote_endpoint_returns_201() {
        let f = fixture();
        let entry = DocketEntry::new(DocketEntryId::new(), SessionId::new(), CaseId::new(), 1);
        let entry_id = *entry.id();
        f.entries.save(&entry).await.unwrap();
        let member_id = f.members.register("Justice A", true);
        let text_id = f
            .texts
            .register(KnowledgeType::OnMerits, "Dismissal", "Appeal dismissed.");

        let app = docket_router().with_state(f.state);
        let body = format!(
            r#"{{
                "member_id": "{}",
                "role": "Rapporteur",
                "knowledge_type": "OnMerits",
                "merits_decision_id": "{}"
            }}"#,
            member_id, text_id
        );
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/docket-entries/{}/votes", entry_id))
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
    async fn unknown_entry_returns_404() {
        let f = fixture();
        let app = docket_router().with_state(f.state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/docket-entries/{}/group-votes", DocketEntryId::new()))
                    .header("X-Actor-Id", "clerk-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
