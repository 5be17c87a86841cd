//! FinalizeJudgmentHandler - command handler for closing a case.
//!
//! Binds the entry to one completed voting, creates the (at most one)
//! judgment, and moves the entry to `Judged`. Other votings still
//! pending block the operation unless the caller acknowledges them
//! explicitly; the engine never decides for the board that an
//! unresolved ex-officio voting does not matter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::Judgment;
use crate::domain::foundation::{
    domain_event, CommandMetadata, DocketEntryId, DomainError, EventEnvelope, EventId, JudgmentId,
    Timestamp, VotingId,
};
use crate::ports::{DocketEntryRepository, EventPublisher};

/// Command to finalize the judgment of a docket entry.
#[derive(Debug, Clone)]
pub struct FinalizeJudgmentCommand {
    pub docket_entry_id: DocketEntryId,
    pub binding_voting_id: VotingId,
    pub minutes: Option<String>,
    /// Proceed past other votings still pending.
    pub acknowledge_pending: bool,
}

/// Result of successfully finalizing a judgment.
#[derive(Debug, Clone)]
pub struct FinalizeJudgmentResult {
    pub judgment: Judgment,
    pub event: JudgmentFinalizedEvent,
}

/// Event published when a case is judged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentFinalizedEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub judgment_id: JudgmentId,
    pub binding_voting_id: VotingId,
    pub finalized_at: Timestamp,
}

domain_event!(
    JudgmentFinalizedEvent,
    event_type = "docket.judgment_finalized",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = finalized_at,
    event_id = event_id
);

/// Error type for finalizing a judgment.
#[derive(Debug, Clone)]
pub enum FinalizeJudgmentError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Domain error (binding voting missing/pending, already judged,
    /// unacknowledged pending votings).
    Domain(DomainError),
}

impl std::fmt::Display for FinalizeJudgmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalizeJudgmentError::EntryNotFound(id) => {
                write!(f, "Docket entry not found: {}", id)
            }
            FinalizeJudgmentError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FinalizeJudgmentError {}

impl From<DomainError> for FinalizeJudgmentError {
    fn from(err: DomainError) -> Self {
        FinalizeJudgmentError::Domain(err)
    }
}

/// Handler for finalizing judgments.
pub struct FinalizeJudgmentHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl FinalizeJudgmentHandler {
    pub fn new(
        entry_repository: Arc<dyn DocketEntryRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            entry_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: FinalizeJudgmentCommand,
        metadata: CommandMetadata,
    ) -> Result<FinalizeJudgmentResult, FinalizeJudgmentError> {
        // 1. Find the entry
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(FinalizeJudgmentError::EntryNotFound(cmd.docket_entry_id))?;

        // 2. Finalize (domain checks the preconditions)
        let judgment = entry
            .finalize_judgment(cmd.binding_voting_id, cmd.minutes, cmd.acknowledge_pending)?
            .clone();
        self.entry_repository.update(&entry).await?;

        tracing::info!(
            docket_entry_id = %cmd.docket_entry_id,
            judgment_id = %judgment.id(),
            binding_voting_id = %cmd.binding_voting_id,
            "judgment finalized"
        );

        // 3. Create and publish event
        let event = JudgmentFinalizedEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            judgment_id: *judgment.id(),
            binding_voting_id: cmd.binding_voting_id,
            finalized_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(FinalizeJudgmentResult { judgment, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryDocketEntryRepository, InMemoryEventBus};
    use crate::domain::docket::{
        DecidingVote, DocketEntry, MemberRole, Tallies, VoteSelection,
    };
    use crate::domain::foundation::{CaseId, DecisionTextId, ErrorCode, MemberId, SessionId};

    struct Fixture {
        entries: Arc<InMemoryDocketEntryRepository>,
        bus: Arc<InMemoryEventBus>,
        handler: FinalizeJudgmentHandler,
    }

    fn fixture() -> Fixture {
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = FinalizeJudgmentHandler::new(entries.clone(), bus.clone());
        Fixture {
            entries,
            bus,
            handler,
        }
    }

    fn tallies() -> Tallies {
        Tallies {
            total: 1,
            in_favor: 1,
            against: 0,
            abstentions: 0,
        }
    }

    /// Entry with one completed voting plus, optionally, one pending.
    async fn seed_entry(f: &Fixture, with_pending: bool) -> (DocketEntryId, VotingId) {
        let mut entry = DocketEntry::new(DocketEntryId::new(), SessionId::new(), CaseId::new(), 1);
        let rapporteur = MemberId::new();
        entry
            .cast_vote(
                rapporteur,
                MemberRole::Rapporteur,
                VoteSelection::OnMerits {
                    merits: DecisionTextId::new(),
                    ex_officio: None,
                },
                None,
            )
            .unwrap();
        if with_pending {
            entry
                .cast_vote(
                    MemberId::new(),
                    MemberRole::Reviewer,
                    VoteSelection::OnMerits {
                        merits: DecisionTextId::new(),
                        ex_officio: None,
                    },
                    None,
                )
                .unwrap();
        }
        let opened = entry.group_votes().unwrap();
        let binding = opened[0];
        entry
            .complete_voting(&binding, rapporteur, DecidingVote::NotUsed, tallies(), None)
            .unwrap();
        let id = *entry.id();
        f.entries.save(&entry).await.unwrap();
        (id, binding)
    }

    #[tokio::test]
    async fn finalizes_and_marks_entry_judged() {
        let f = fixture();
        let (entry_id, binding) = seed_entry(&f, false).await;

        let result = f
            .handler
            .handle(
                FinalizeJudgmentCommand {
                    docket_entry_id: entry_id,
                    binding_voting_id: binding,
                    minutes: Some("decided as per the rapporteur".to_string()),
                    acknowledge_pending: false,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        assert_eq!(result.judgment.binding_voting_id(), &binding);
        let entry = f.entries.find_by_id(&entry_id).await.unwrap().unwrap();
        assert!(entry.is_judged());
        assert!(f.bus.has_event("docket.judgment_finalized"));
    }

    #[tokio::test]
    async fn pending_voting_blocks_until_acknowledged() {
        let f = fixture();
        let (entry_id, binding) = seed_entry(&f, true).await;

        let err = f
            .handler
            .handle(
                FinalizeJudgmentCommand {
                    docket_entry_id: entry_id,
                    binding_voting_id: binding,
                    minutes: None,
                    acknowledge_pending: false,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();
        match err {
            FinalizeJudgmentError::Domain(err) => {
                assert_eq!(err.code, ErrorCode::PreconditionFailed);
                assert!(err.details.contains_key("pending_voting_ids"));
            }
            other => panic!("expected PreconditionFailed, got {}", other),
        }

        f.handler
            .handle(
                FinalizeJudgmentCommand {
                    docket_entry_id: entry_id,
                    binding_voting_id: binding,
                    minutes: None,
                    acknowledge_pending: true,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn second_judgment_fails_precondition() {
        let f = fixture();
        let (entry_id, binding) = seed_entry(&f, false).await;

        let cmd = FinalizeJudgmentCommand {
            docket_entry_id: entry_id,
            binding_voting_id: binding,
            minutes: None,
            acknowledge_pending: false,
        };
        f.handler
            .handle(cmd.clone(), CommandMetadata::test_fixture())
            .await
            .unwrap();

        let err = f
            .handler
            .handle(cmd, CommandMetadata::test_fixture())
            .await
            .unwrap_err();
        match err {
            FinalizeJudgmentError::Domain(err) => {
                assert_eq!(err.code, ErrorCode::PreconditionFailed)
            }
            other => panic!("expected PreconditionFailed, got {}", other),
        }
    }
}
