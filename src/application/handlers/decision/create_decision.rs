//! CreateDecisionHandler - command handler for deriving a decision.
//!
//! Decisions are created on demand after judgment, never
//! automatically. The per-year decision number comes from the
//! repository so concurrent creations cannot share one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::decision::Decision;
use crate::domain::foundation::{
    domain_event, CommandMetadata, DecisionId, DocketEntryId, DomainError, EventEnvelope, EventId,
    JudgmentId, Timestamp,
};
use crate::ports::{DecisionRepository, DocketEntryRepository, EventPublisher};

/// Command to create a decision from a judgment.
#[derive(Debug, Clone)]
pub struct CreateDecisionCommand {
    pub judgment_id: JudgmentId,
    pub ementa_title: String,
    pub ementa_body: String,
    pub vote_path: Option<String>,
}

/// Result of successfully creating a decision.
#[derive(Debug, Clone)]
pub struct CreateDecisionResult {
    pub decision: Decision,
    pub event: DecisionCreatedEvent,
}

/// Event published when a decision is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionCreatedEvent {
    pub event_id: EventId,
    pub decision_id: DecisionId,
    pub judgment_id: JudgmentId,
    pub docket_entry_id: DocketEntryId,
    pub number: u32,
    pub year: i32,
    pub created_at: Timestamp,
}

domain_event!(
    DecisionCreatedEvent,
    event_type = "decision.created",
    aggregate_id = decision_id,
    aggregate_type = "Decision",
    occurred_at = created_at,
    event_id = event_id
);

/// Error type for creating a decision.
#[derive(Debug, Clone)]
pub enum CreateDecisionError {
    /// No judged entry carries this judgment.
    JudgmentNotFound(JudgmentId),
    /// Domain error (decision already exists, validation).
    Domain(DomainError),
}

impl std::fmt::Display for CreateDecisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateDecisionError::JudgmentNotFound(id) => {
                write!(f, "Judgment not found: {}", id)
            }
            CreateDecisionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateDecisionError {}

impl From<DomainError> for CreateDecisionError {
    fn from(err: DomainError) -> Self {
        CreateDecisionError::Domain(err)
    }
}

/// Handler for creating decisions.
pub struct CreateDecisionHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    decision_repository: Arc<dyn DecisionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateDecisionHandler {
    pub fn new(
        entry_repository: Arc<dyn DocketEntryRepository>,
        decision_repository: Arc<dyn DecisionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            entry_repository,
            decision_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDecisionResult, CreateDecisionError> {
        // 1. The judgment must belong to a judged entry
        let entry = self
            .entry_repository
            .find_by_judgment(&cmd.judgment_id)
            .await?
            .ok_or(CreateDecisionError::JudgmentNotFound(cmd.judgment_id))?;

        // 2. At most one decision per judgment
        if let Some(existing) = self
            .decision_repository
            .find_by_judgment(&cmd.judgment_id)
            .await?
        {
            return Err(DomainError::conflict("Judgment already has a decision")
                .with_detail("judgment_id", cmd.judgment_id.to_string())
                .with_detail("decision_id", existing.id().to_string())
                .into());
        }

        // 3. Allocate the per-year number and build the aggregate
        let year = Timestamp::now().year();
        let number = self.decision_repository.next_number(year).await?;
        let decision = Decision::new(
            DecisionId::new(),
            cmd.judgment_id,
            number,
            year,
            cmd.ementa_title,
            cmd.ementa_body,
            cmd.vote_path,
        )?;

        // 4. Persist: the save re-checks the judgment uniqueness, so a
        //    concurrent creation resolves to a Conflict
        self.decision_repository.save(&decision).await?;

        tracing::info!(
            decision_id = %decision.id(),
            judgment_id = %cmd.judgment_id,
            number,
            year,
            "decision created"
        );

        // 5. Create and publish event
        let event = DecisionCreatedEvent {
            event_id: EventId::new(),
            decision_id: *decision.id(),
            judgment_id: cmd.judgment_id,
            docket_entry_id: *entry.id(),
            number,
            year,
            created_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(CreateDecisionResult { decision, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryDecisionRepository, InMemoryDocketEntryRepository, InMemoryEventBus,
    };
    use crate::domain::docket::{
        DecidingVote, DocketEntry, MemberRole, Tallies, VoteSelection,
    };
    use crate::domain::foundation::{
        CaseId, DecisionStatus, DecisionTextId, ErrorCode, MemberId, SessionId,
    };

    struct Fixture {
        entries: Arc<InMemoryDocketEntryRepository>,
        decisions: Arc<InMemoryDecisionRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: CreateDecisionHandler,
    }

    fn fixture() -> Fixture {
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let decisions = Arc::new(InMemoryDecisionRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler =
            CreateDecisionHandler::new(entries.clone(), decisions.clone(), bus.clone());
        Fixture {
            entries,
            decisions,
            bus,
            handler,
        }
    }

    async fn seed_judged_entry(f: &Fixture) -> JudgmentId {
        let mut entry = DocketEntry::new(DocketEntryId::new(), SessionId::new(), CaseId::new(), 1);
        let member = MemberId::new();
        entry
            .cast_vote(
                member,
                MemberRole::Rapporteur,
                VoteSelection::OnMerits {
                    merits: DecisionTextId::new(),
                    ex_officio: None,
                },
                None,
            )
            .unwrap();
        let voting_id = entry.group_votes().unwrap()[0];
        entry
            .complete_voting(
                &voting_id,
                member,
                DecidingVote::NotUsed,
                Tallies {
                    total: 1,
                    in_favor: 1,
                    against: 0,
                    abstentions: 0,
                },
                None,
            )
            .unwrap();
        let judgment_id = *entry.finalize_judgment(voting_id, None, false).unwrap().id();
        f.entries.save(&entry).await.unwrap();
        judgment_id
    }

    fn command(judgment_id: JudgmentId) -> CreateDecisionCommand {
        CreateDecisionCommand {
            judgment_id,
            ementa_title: "Appeal dismissed".to_string(),
            ementa_body: "Dismissed for lack of standing.".to_string(),
            vote_path: None,
        }
    }

    #[tokio::test]
    async fn creates_pending_decision_with_yearly_number() {
        let f = fixture();
        let judgment_id = seed_judged_entry(&f).await;

        let result = f
            .handler
            .handle(command(judgment_id), CommandMetadata::test_fixture())
            .await
            .unwrap();

        assert_eq!(result.decision.status(), DecisionStatus::Pending);
        assert_eq!(result.decision.number(), 1);
        assert_eq!(result.decision.year(), Timestamp::now().year());
        assert!(f.bus.has_event("decision.created"));

        // The next decision of the year takes the next number.
        let second_judgment = seed_judged_entry(&f).await;
        let second = f
            .handler
            .handle(command(second_judgment), CommandMetadata::test_fixture())
            .await
            .unwrap();
        assert_eq!(second.decision.number(), 2);
    }

    #[tokio::test]
    async fn unknown_judgment_is_reported() {
        let f = fixture();
        let err = f
            .handler
            .handle(command(JudgmentId::new()), CommandMetadata::test_fixture())
            .await
            .unwrap_err();
        assert!(matches!(err, CreateDecisionError::JudgmentNotFound(_)));
    }

    #[tokio::test]
    async fn second_decision_for_judgment_conflicts() {
        let f = fixture();
        let judgment_id = seed_judged_entry(&f).await;

        f.handler
            .handle(command(judgment_id), CommandMetadata::test_fixture())
            .await
            .unwrap();

        let err = f
            .handler
            .handle(command(judgment_id), CommandMetadata::test_fixture())
            .await
            .unwrap_err();
        match err {
            CreateDecisionError::Domain(err) => assert_eq!(err.code, ErrorCode::Conflict),
            other => panic!("expected Conflict, got {}", other),
        }
    }

    #[tokio::test]
    async fn empty_title_is_rejected() {
        let f = fixture();
        let judgment_id = seed_judged_entry(&f).await;

        let mut cmd = command(judgment_id);
        cmd.ementa_title = "  ".to_string();
        let err = f
            .handler
            .handle(cmd, CommandMetadata::test_fixture())
            .await
            .unwrap_err();
        match err {
            CreateDecisionError::Domain(err) => {
                assert_eq!(err.code, ErrorCode::ValidationFailed)
            }
            other => panic!("expected ValidationFailed, got {}", other),
        }
        assert_eq!(f.decisions.next_number(2026).await.unwrap(), 1);
    }
}
