//! CastVoteHandler - command handler for casting a vote.
//!
//! Appends one member's position to the entry's vote ledger. Casting
//! has no side effect beyond the append; grouping into votings is a
//! separate, explicit step.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::{KnowledgeType, MemberRole, VoteSelection};
use crate::domain::foundation::{
    domain_event, CommandMetadata, DecisionTextId, DocketEntryId, DomainError, ErrorCode,
    EventEnvelope, EventId, MemberId, Timestamp, VoteId,
};
use crate::ports::{DecisionTextRegistry, DocketEntryRepository, EventPublisher, MemberRegistry};

/// Command to cast a vote on a docket entry.
#[derive(Debug, Clone)]
pub struct CastVoteCommand {
    pub docket_entry_id: DocketEntryId,
    pub member_id: MemberId,
    pub role: MemberRole,
    pub knowledge_type: KnowledgeType,
    pub preliminary_decision: Option<DecisionTextId>,
    pub merits_decision: Option<DecisionTextId>,
    pub ex_officio_decision: Option<DecisionTextId>,
    pub rationale: Option<String>,
}

/// Result of successfully casting a vote.
#[derive(Debug, Clone)]
pub struct CastVoteResult {
    pub vote_id: VoteId,
    pub event: VoteCastEvent,
}

/// Event published when a vote is cast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteCastEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub vote_id: VoteId,
    pub member_id: MemberId,
    pub knowledge_type: KnowledgeType,
    pub cast_at: Timestamp,
}

domain_event!(
    VoteCastEvent,
    event_type = "docket.vote_cast",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = cast_at,
    event_id = event_id
);

/// Error type for casting a vote.
#[derive(Debug, Clone)]
pub enum CastVoteError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Domain error (selection inconsistency, duplicate vote, judged).
    Domain(DomainError),
}

impl std::fmt::Display for CastVoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastVoteError::EntryNotFound(id) => write!(f, "Docket entry not found: {}", id),
            CastVoteError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CastVoteError {}

impl From<DomainError> for CastVoteError {
    fn from(err: DomainError) -> Self {
        CastVoteError::Domain(err)
    }
}

/// Handler for casting votes.
pub struct CastVoteHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    member_registry: Arc<dyn MemberRegistry>,
    text_registry: Arc<dyn DecisionTextRegistry>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CastVoteHandler {
    pub fn new(
        entry_repository: Arc<dyn DocketEntryRepository>,
        member_registry: Arc<dyn MemberRegistry>,
        text_registry: Arc<dyn DecisionTextRegistry>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            entry_repository,
            member_registry,
            text_registry,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CastVoteCommand,
        metadata: CommandMetadata,
    ) -> Result<CastVoteResult, CastVoteError> {
        // 1. Validate the selection (illegal combinations rejected here)
        let selection = VoteSelection::from_parts(
            cmd.knowledge_type,
            cmd.preliminary_decision,
            cmd.merits_decision,
            cmd.ex_officio_decision,
        )?;

        // 2. The voter must be an active member
        let failed = self
            .member_registry
            .missing_or_inactive(&[cmd.member_id])
            .await?;
        if !failed.is_empty() {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                "Voting member is not on the roster or inactive",
            )
            .with_detail("member_id", cmd.member_id.to_string())
            .into());
        }

        // 3. Pre-fill the rationale from the canonical text when absent
        let rationale = match cmd.rationale {
            Some(text) => Some(text),
            None => self.canonical_rationale(&selection).await?,
        };

        // 4. Append to the ledger
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(CastVoteError::EntryNotFound(cmd.docket_entry_id))?;

        let vote_id = *entry
            .cast_vote(cmd.member_id, cmd.role, selection, rationale)?
            .id();
        self.entry_repository.update(&entry).await?;

        // 5. Create and publish event
        let event = VoteCastEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            vote_id,
            member_id: cmd.member_id,
            knowledge_type: cmd.knowledge_type,
            cast_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(CastVoteResult { vote_id, event })
    }

    /// Looks up the canonical text matching the vote's main decision.
    ///
    /// Best-effort: an unknown id simply leaves the rationale empty,
    /// since the registry is not required for engine correctness.
    async fn canonical_rationale(
        &self,
        selection: &VoteSelection,
    ) -> Result<Option<String>, DomainError> {
        let decision_id = selection.merits().or_else(|| selection.preliminary());
        let Some(decision_id) = decision_id else {
            return Ok(None);
        };
        Ok(self
            .text_registry
            .find_by_id(&decision_id)
            .await?
            .map(|text| text.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryDecisionTextRegistry, InMemoryDocketEntryRepository, InMemoryEventBus,
        InMemoryMemberRegistry,
    };
    use crate::domain::docket::DocketEntry;
    use crate::domain::foundation::{CaseId, SessionId};

    struct Fixture {
        entries: Arc<InMemoryDocketEntryRepository>,
        members: Arc<InMemoryMemberRegistry>,
        texts: Arc<InMemoryDecisionTextRegistry>,
        bus: Arc<InMemoryEventBus>,
        handler: CastVoteHandler,
    }

    fn fixture() -> Fixture {
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let members = Arc::new(InMemoryMemberRegistry::new());
        let texts = Arc::new(InMemoryDecisionTextRegistry::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CastVoteHandler::new(
            entries.clone(),
            members.clone(),
            texts.clone(),
            bus.clone(),
        );
        Fixture {
            entries,
            members,
            texts,
            bus,
            handler,
        }
    }

    async fn seed_entry(f: &Fixture) -> DocketEntryId {
        let entry = DocketEntry::new(DocketEntryId::new(), SessionId::new(), CaseId::new(), 1);
        let id = *entry.id();
        f.entries.save(&entry).await.unwrap();
        id
    }

    fn merits_command(
        entry_id: DocketEntryId,
        member_id: MemberId,
        merits: DecisionTextId,
    ) -> CastVoteCommand {
        CastVoteCommand {
            docket_entry_id: entry_id,
            member_id,
            role: MemberRole::Rapporteur,
            knowledge_type: KnowledgeType::OnMerits,
            preliminary_decision: None,
            merits_decision: Some(merits),
            ex_officio_decision: None,
            rationale: None,
        }
    }

    #[tokio::test]
    async fn casts_vote_and_prefills_rationale() {
        let f = fixture();
        let entry_id = seed_entry(&f).await;
        let member = f.members.register("Dr. Silva", true);
        let merits = f.texts.register(
            KnowledgeType::OnMerits,
            "Standard dismissal",
            "The appeal is dismissed.",
        );

        let result = f
            .handler
            .handle(
                merits_command(entry_id, member, merits),
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let entry = f.entries.find_by_id(&entry_id).await.unwrap().unwrap();
        let vote = entry
            .votes()
            .iter()
            .find(|v| v.id() == &result.vote_id)
            .unwrap();
        assert_eq!(vote.rationale(), Some("The appeal is dismissed."));
        assert!(f.bus.has_event("docket.vote_cast"));
    }

    #[tokio::test]
    async fn explicit_rationale_wins_over_canonical_text() {
        let f = fixture();
        let entry_id = seed_entry(&f).await;
        let member = f.members.register("Dr. Silva", true);
        let merits = f
            .texts
            .register(KnowledgeType::OnMerits, "Standard", "Canonical body");

        let mut cmd = merits_command(entry_id, member, merits);
        cmd.rationale = Some("my own reasoning".to_string());
        let result = f
            .handler
            .handle(cmd, CommandMetadata::test_fixture())
            .await
            .unwrap();

        let entry = f.entries.find_by_id(&entry_id).await.unwrap().unwrap();
        let vote = entry
            .votes()
            .iter()
            .find(|v| v.id() == &result.vote_id)
            .unwrap();
        assert_eq!(vote.rationale(), Some("my own reasoning"));
    }

    #[tokio::test]
    async fn inconsistent_selection_is_rejected() {
        let f = fixture();
        let entry_id = seed_entry(&f).await;
        let member = f.members.register("Dr. Silva", true);

        let err = f
            .handler
            .handle(
                CastVoteCommand {
                    docket_entry_id: entry_id,
                    member_id: member,
                    role: MemberRole::Voter,
                    knowledge_type: KnowledgeType::NonAdmission,
                    preliminary_decision: None,
                    merits_decision: Some(DecisionTextId::new()),
                    ex_officio_decision: None,
                    rationale: None,
                },
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            CastVoteError::Domain(err) => assert_eq!(err.code, ErrorCode::ValidationFailed),
            other => panic!("expected ValidationFailed, got {}", other),
        }
        assert_eq!(f.bus.event_count(), 0);
    }

    #[tokio::test]
    async fn second_vote_by_same_member_conflicts() {
        let f = fixture();
        let entry_id = seed_entry(&f).await;
        let member = f.members.register("Dr. Silva", true);
        let merits = DecisionTextId::new();

        f.handler
            .handle(
                merits_command(entry_id, member, merits),
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap();

        let err = f
            .handler
            .handle(
                merits_command(entry_id, member, merits),
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            CastVoteError::Domain(err) => assert_eq!(err.code, ErrorCode::Conflict),
            other => panic!("expected Conflict, got {}", other),
        }
    }

    #[tokio::test]
    async fn inactive_member_cannot_vote() {
        let f = fixture();
        let entry_id = seed_entry(&f).await;
        let member = f.members.register("Dr. Rocha", false);

        let err = f
            .handler
            .handle(
                merits_command(entry_id, member, DecisionTextId::new()),
                CommandMetadata::test_fixture(),
            )
            .await
            .unwrap_err();

        match err {
            CastVoteError::Domain(err) => assert_eq!(err.code, ErrorCode::MemberNotFound),
            other => panic!("expected MemberNotFound, got {}", other),
        }
    }
}
