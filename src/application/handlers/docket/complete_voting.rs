//! CompleteVotingHandler - command handler for resolving a voting.
//!
//! Records the binding outcome of one voting: the winning member,
//! operator-supplied tallies, deciding-vote bookkeeping, and optional
//! final text. Completion is one-way; there is no reopen operation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::{DecidingVote, Tallies};
use crate::domain::foundation::{
    domain_event, CommandMetadata, DocketEntryId, DomainError, EventEnvelope, EventId, MemberId,
    Timestamp, VotingId,
};
use crate::ports::{DocketEntryRepository, EventPublisher};

/// Command to complete a voting.
#[derive(Debug, Clone)]
pub struct CompleteVotingCommand {
    pub docket_entry_id: DocketEntryId,
    pub voting_id: VotingId,
    pub winning_member_id: MemberId,
    pub deciding_vote_used: bool,
    pub deciding_vote_member_id: Option<MemberId>,
    pub tallies: Tallies,
    pub final_text: Option<String>,
}

/// Result of successfully completing a voting.
#[derive(Debug, Clone)]
pub struct CompleteVotingResult {
    /// True when the supplied tallies do not add up; stored as given,
    /// surfaced as a warning for the caller to display.
    pub tally_warning: bool,
    pub event: VotingCompletedEvent,
}

/// Event published when a voting is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotingCompletedEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub voting_id: VotingId,
    pub winning_member_id: MemberId,
    pub deciding_vote_used: bool,
    pub completed_at: Timestamp,
}

domain_event!(
    VotingCompletedEvent,
    event_type = "docket.voting_completed",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = completed_at,
    event_id = event_id
);

/// Error type for completing a voting.
#[derive(Debug, Clone)]
pub enum CompleteVotingError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Domain error (voting unknown/completed, winner not in voting,
    /// deciding-vote fields inconsistent).
    Domain(DomainError),
}

impl std::fmt::Display for CompleteVotingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompleteVotingError::EntryNotFound(id) => {
                write!(f, "Docket entry not found: {}", id)
            }
            CompleteVotingError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CompleteVotingError {}

impl From<DomainError> for CompleteVotingError {
    fn from(err: DomainError) -> Self {
        CompleteVotingError::Domain(err)
    }
}

/// Handler for completing votings.
pub struct CompleteVotingHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteVotingHandler {
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
        cmd: CompleteVotingCommand,
        metadata: CommandMetadata,
    ) -> Result<CompleteVotingResult, CompleteVotingError> {
        // 1. Cross-field validation of the deciding vote
        let deciding_vote =
            DecidingVote::from_parts(cmd.deciding_vote_used, cmd.deciding_vote_member_id)?;

        // 2. Find the entry and complete the voting
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(CompleteVotingError::EntryNotFound(cmd.docket_entry_id))?;

        let tally_warning = entry.complete_voting(
            &cmd.voting_id,
            cmd.winning_member_id,
            deciding_vote,
            cmd.tallies,
            cmd.final_text,
        )?;
        self.entry_repository.update(&entry).await?;

        if tally_warning {
            tracing::warn!(
                docket_entry_id = %cmd.docket_entry_id,
                voting_id = %cmd.voting_id,
                total = cmd.tallies.total,
                in_favor = cmd.tallies.in_favor,
                against = cmd.tallies.against,
                abstentions = cmd.tallies.abstentions,
                "voting completed with inconsistent tallies"
            );
        }

        // 3. Create and publish event
        let event = VotingCompletedEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            voting_id: cmd.voting_id,
            winning_member_id: cmd.winning_member_id,
            deciding_vote_used: cmd.deciding_vote_used,
            completed_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(CompleteVotingResult {
            tally_warning,
            event,
        })
    }
}
