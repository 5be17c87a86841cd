//! Judgment record - the finalized outcome of a docket entry.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocketEntryId, JudgmentId, Timestamp, VotingId};

/// The outcome of a fully resolved docket entry.
///
/// Created exactly once, when the entry transitions to `Judged`;
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    id: JudgmentId,
    docket_entry_id: DocketEntryId,
    /// The voting whose outcome is binding.
    binding_voting_id: VotingId,
    minutes: Option<String>,
    created_at: Timestamp,
}

impl Judgment {
    pub(crate) fn new(
        id: JudgmentId,
        docket_entry_id: DocketEntryId,
        binding_voting_id: VotingId,
        minutes: Option<String>,
    ) -> Self {
        Self {
            id,
            docket_entry_id,
            binding_voting_id,
            minutes,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute a judgment from persistence.
    pub fn reconstitute(
        id: JudgmentId,
        docket_entry_id: DocketEntryId,
        binding_voting_id: VotingId,
        minutes: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            docket_entry_id,
            binding_voting_id,
            minutes,
            created_at,
        }
    }

    pub fn id(&self) -> &JudgmentId {
        &self.id
    }

    pub fn docket_entry_id(&self) -> &DocketEntryId {
        &self.docket_entry_id
    }

    pub fn binding_voting_id(&self) -> &VotingId {
        &self.binding_voting_id
    }

    pub fn minutes(&self) -> Option<&str> {
        self.minutes.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}
