//! SupersedeVoteHandler - command handler for re-casting a vote.
//!
//! The explicit re-cast operation: the member's current vote stays in
//! the ledger, marked superseded with a link to the replacement. Only
//! the replacement participates in later grouping passes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::{KnowledgeType, MemberRole, VoteSelection};
use crate::domain::foundation::{
    domain_event, CommandMetadata, DecisionTextId, DocketEntryId, DomainError, EventEnvelope,
    EventId, MemberId, Timestamp, VoteId,
};
use crate::ports::{DocketEntryRepository, EventPublisher};

/// Command to supersede a member's current vote.
#[derive(Debug, Clone)]
pub struct SupersedeVoteCommand {
    pub docket_entry_id: DocketEntryId,
    pub member_id: MemberId,
    pub role: MemberRole,
    pub knowledge_type: KnowledgeType,
    pub preliminary_decision: Option<DecisionTextId>,
    pub merits_decision: Option<DecisionTextId>,
    pub ex_officio_decision: Option<DecisionTextId>,
    pub rationale: Option<String>,
}

/// Result of successfully superseding a vote.
#[derive(Debug, Clone)]
pub struct SupersedeVoteResult {
    pub old_vote_id: VoteId,
    pub new_vote_id: VoteId,
    pub event: VoteSupersededEvent,
}

/// Event published when a vote is superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteSupersededEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub member_id: MemberId,
    pub old_vote_id: VoteId,
    pub new_vote_id: VoteId,
    pub superseded_at: Timestamp,
}

domain_event!(
    VoteSupersededEvent,
    event_type = "docket.vote_superseded",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = superseded_at,
    event_id = event_id
);

/// Error type for superseding a vote.
#[derive(Debug, Clone)]
pub enum SupersedeVoteError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Domain error (no current vote, selection inconsistency, judged).
    Domain(DomainError),
}

impl std::fmt::Display for SupersedeVoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SupersedeVoteError::EntryNotFound(id) => write!(f, "Docket entry not found: {}", id),
            SupersedeVoteError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SupersedeVoteError {}

impl From<DomainError> for SupersedeVoteError {
    fn from(err: DomainError) -> Self {
        SupersedeVoteError::Domain(err)
    }
}

/// Handler for superseding votes.
pub struct SupersedeVoteHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SupersedeVoteHandler {
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
        cmd: SupersedeVoteCommand,
        metadata: CommandMetadata,
    ) -> Result<SupersedeVoteResult, SupersedeVoteError> {
        // 1. Validate the replacement selection
        let selection = VoteSelection::from_parts(
            cmd.knowledge_type,
            cmd.preliminary_decision,
            cmd.merits_decision,
            cmd.ex_officio_decision,
        )?;

        // 2. Find the entry and the vote being replaced
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(SupersedeVoteError::EntryNotFound(cmd.docket_entry_id))?;

        let old_vote_id = entry
            .current_vote_of(&cmd.member_id)
            .map(|v| *v.id())
            .ok_or_else(|| {
                DomainError::precondition("Member has no current vote to supersede")
                    .with_detail("docket_entry_id", cmd.docket_entry_id.to_string())
                    .with_detail("member_id", cmd.member_id.to_string())
            })?;

        // 3. Re-cast
        let new_vote_id = *entry
            .supersede_vote(cmd.member_id, cmd.role, selection, cmd.rationale)?
            .id();
        self.entry_repository.update(&entry).await?;

        // 4. Create and publish event
        let event = VoteSupersededEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            member_id: cmd.member_id,
            old_vote_id,
            new_vote_id,
            superseded_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(SupersedeVoteResult {
            old_vote_id,
            new_vote_id,
            event,
        })
    }
}
