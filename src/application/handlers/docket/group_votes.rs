//! GroupVotesHandler - command handler for the grouping pass.
//!
//! Partitions the entry's ungrouped current votes into votings by
//! decision combination. Safe to retry: a pass with nothing new to
//! group writes nothing and emits nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::docket::Voting;
use crate::domain::foundation::{
    domain_event, CommandMetadata, DocketEntryId, DomainError, EventEnvelope, EventId, Timestamp,
    VotingId,
};
use crate::ports::{DocketEntryRepository, EventPublisher};

/// Command to run a grouping pass on a docket entry.
#[derive(Debug, Clone)]
pub struct GroupVotesCommand {
    pub docket_entry_id: DocketEntryId,
}

/// Result of a grouping pass.
#[derive(Debug, Clone)]
pub struct GroupVotesResult {
    /// Votings opened by this pass (empty when only existing pending
    /// votings absorbed the delta, or nothing was ungrouped).
    pub opened_voting_ids: Vec<VotingId>,
    /// All votings of the entry after the pass.
    pub votings: Vec<Voting>,
    /// The emitted event, when the pass changed anything.
    pub event: Option<VotesGroupedEvent>,
}

/// Event published when a grouping pass assigns votes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VotesGroupedEvent {
    pub event_id: EventId,
    pub docket_entry_id: DocketEntryId,
    pub opened_voting_ids: Vec<VotingId>,
    pub grouped_votes: u32,
    pub grouped_at: Timestamp,
}

domain_event!(
    VotesGroupedEvent,
    event_type = "docket.votes_grouped",
    aggregate_id = docket_entry_id,
    aggregate_type = "DocketEntry",
    occurred_at = grouped_at,
    event_id = event_id
);

/// Error type for the grouping pass.
#[derive(Debug, Clone)]
pub enum GroupVotesError {
    /// Docket entry not found.
    EntryNotFound(DocketEntryId),
    /// Domain error (entry judged, concurrent modification).
    Domain(DomainError),
}

impl std::fmt::Display for GroupVotesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupVotesError::EntryNotFound(id) => write!(f, "Docket entry not found: {}", id),
            GroupVotesError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GroupVotesError {}

impl From<DomainError> for GroupVotesError {
    fn from(err: DomainError) -> Self {
        GroupVotesError::Domain(err)
    }
}

/// Handler for grouping votes into votings.
pub struct GroupVotesHandler {
    entry_repository: Arc<dyn DocketEntryRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl GroupVotesHandler {
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
        cmd: GroupVotesCommand,
        metadata: CommandMetadata,
    ) -> Result<GroupVotesResult, GroupVotesError> {
        // 1. Find the entry
        let mut entry = self
            .entry_repository
            .find_by_id(&cmd.docket_entry_id)
            .await?
            .ok_or(GroupVotesError::EntryNotFound(cmd.docket_entry_id))?;

        // 2. Run the pass; track assignment count to detect a no-op
        let assigned_before = assigned_votes(&entry);
        let opened_voting_ids = entry.group_votes()?;
        let grouped = assigned_votes(&entry) - assigned_before;

        // 3. A no-op pass writes nothing, keeping retries free
        if grouped == 0 {
            return Ok(GroupVotesResult {
                opened_voting_ids,
                votings: entry.votings().to_vec(),
                event: None,
            });
        }

        self.entry_repository.update(&entry).await?;

        tracing::debug!(
            docket_entry_id = %cmd.docket_entry_id,
            grouped,
            opened = opened_voting_ids.len(),
            "grouping pass assigned votes"
        );

        // 4. Create and publish event
        let event = VotesGroupedEvent {
            event_id: EventId::new(),
            docket_entry_id: cmd.docket_entry_id,
            opened_voting_ids: opened_voting_ids.clone(),
            grouped_votes: grouped as u32,
            grouped_at: Timestamp::now(),
        };

        let envelope = EventEnvelope::from_event(&event)
            .with_correlation_id(metadata.correlation_id())
            .with_actor_id(metadata.actor_id.clone());
        self.event_publisher.publish(envelope).await?;

        Ok(GroupVotesResult {
            opened_voting_ids,
            votings: entry.votings().to_vec(),
            event: Some(event),
        })
    }
}

fn assigned_votes(entry: &crate::domain::docket::DocketEntry) -> usize {
    entry.votings().iter().map(|v| v.vote_ids().len()).sum()
}
