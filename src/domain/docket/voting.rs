//! Voting entity - a group of votes resolved as a unit.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, MemberId, Timestamp, VoteId, VotingId, VotingStatus,
};

use super::vote::GroupingKey;

/// Operator-supplied tally of a completed voting.
///
/// Tallies are recorded as given, not derived from the vote count:
/// the board may count positions cast by correspondence that never
/// entered the ledger. Inconsistency is a soft warning, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tallies {
    pub total: u32,
    pub in_favor: u32,
    pub against: u32,
    pub abstentions: u32,
}

impl Tallies {
    /// True when the partial counts add up to the total.
    pub fn is_consistent(&self) -> bool {
        self.in_favor + self.against + self.abstentions == self.total
    }
}

/// Whether a tie-breaking deciding vote was used, and by whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "used", rename_all = "snake_case")]
pub enum DecidingVote {
    NotUsed,
    Used { member_id: MemberId },
}

impl DecidingVote {
    /// Builds from the loose flag/member pair received at the boundary.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the flag and the member reference
    ///   disagree (flag set without a member, or member without flag)
    pub fn from_parts(used: bool, member_id: Option<MemberId>) -> Result<Self, DomainError> {
        match (used, member_id) {
            (true, Some(member_id)) => Ok(DecidingVote::Used { member_id }),
            (false, None) => Ok(DecidingVote::NotUsed),
            (true, None) => Err(DomainError::validation(
                "deciding_vote_member_id",
                "A deciding vote requires the member who cast it",
            )),
            (false, Some(_)) => Err(DomainError::validation(
                "deciding_vote_member_id",
                "A deciding-vote member was given but the deciding-vote flag is not set",
            )),
        }
    }

    pub fn was_used(&self) -> bool {
        matches!(self, DecidingVote::Used { .. })
    }

    pub fn member_id(&self) -> Option<&MemberId> {
        match self {
            DecidingVote::Used { member_id } => Some(member_id),
            DecidingVote::NotUsed => None,
        }
    }
}

/// Binding outcome of a completed voting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingOutcome {
    /// Member whose position prevailed.
    pub winning_member_id: MemberId,
    /// Operator-supplied tallies.
    pub tallies: Tallies,
    /// Tie-break bookkeeping.
    pub deciding_vote: DecidingVote,
    /// Consolidated final text of the voting.
    pub final_text: Option<String>,
    /// When the voting was completed.
    pub completed_at: Timestamp,
}

/// A group of votes sharing the same decision combination.
///
/// Created by the grouping pass; holds read-only references to its
/// member votes. Completion is one-way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voting {
    id: VotingId,
    label: String,
    grouping_key: GroupingKey,
    vote_ids: Vec<VoteId>,
    status: VotingStatus,
    outcome: Option<VotingOutcome>,
    created_at: Timestamp,
}

impl Voting {
    /// Opens a new pending voting over the given votes.
    pub fn open(id: VotingId, grouping_key: GroupingKey, vote_ids: Vec<VoteId>) -> Self {
        Self {
            id,
            label: grouping_key.label(),
            grouping_key,
            vote_ids,
            status: VotingStatus::Pending,
            outcome: None,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute a voting from persistence.
    pub fn reconstitute(
        id: VotingId,
        label: String,
        grouping_key: GroupingKey,
        vote_ids: Vec<VoteId>,
        status: VotingStatus,
        outcome: Option<VotingOutcome>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            label,
            grouping_key,
            vote_ids,
            status,
            outcome,
            created_at,
        }
    }

    pub fn id(&self) -> &VotingId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn grouping_key(&self) -> &GroupingKey {
        &self.grouping_key
    }

    pub fn vote_ids(&self) -> &[VoteId] {
        &self.vote_ids
    }

    pub fn status(&self) -> VotingStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<&VotingOutcome> {
        self.outcome.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == VotingStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == VotingStatus::Completed
    }

    pub fn contains_vote(&self, vote_id: &VoteId) -> bool {
        self.vote_ids.contains(vote_id)
    }

    /// Adds delta votes from a later grouping pass.
    ///
    /// Only the aggregate calls this, and only while pending.
    pub(crate) fn absorb_votes(&mut self, vote_ids: impl IntoIterator<Item = VoteId>) {
        debug_assert!(self.is_pending());
        self.vote_ids.extend(vote_ids);
    }

    /// Completes the voting with its binding outcome.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if already completed
    pub(crate) fn complete(&mut self, outcome: VotingOutcome) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::invalid_state("Voting is already completed")
                .with_detail("voting_id", self.id.to_string())
                .with_detail("current_status", self.status.to_string()));
        }

        self.status = VotingStatus::Completed;
        self.outcome = Some(outcome);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::docket::vote::VoteSelection;
    use crate::domain::foundation::DecisionTextId;

    fn merits_key() -> GroupingKey {
        VoteSelection::OnMerits {
            merits: DecisionTextId::new(),
            ex_officio: None,
        }
        .grouping_key()
    }

    fn outcome(winner: MemberId) -> VotingOutcome {
        VotingOutcome {
            winning_member_id: winner,
            tallies: Tallies {
                total: 5,
                in_favor: 3,
                against: 2,
                abstentions: 0,
            },
            deciding_vote: DecidingVote::NotUsed,
            final_text: None,
            completed_at: Timestamp::now(),
        }
    }

    #[test]
    fn tallies_consistency_check() {
        let ok = Tallies {
            total: 5,
            in_favor: 3,
            against: 2,
            abstentions: 0,
        };
        assert!(ok.is_consistent());

        let off = Tallies {
            total: 7,
            in_favor: 3,
            against: 2,
            abstentions: 0,
        };
        assert!(!off.is_consistent());
    }

    #[test]
    fn deciding_vote_requires_matching_parts() {
        assert!(DecidingVote::from_parts(false, None).is_ok());
        assert!(DecidingVote::from_parts(true, Some(MemberId::new())).is_ok());
        assert!(DecidingVote::from_parts(true, None).is_err());
        assert!(DecidingVote::from_parts(false, Some(MemberId::new())).is_err());
    }

    #[test]
    fn open_voting_is_pending_with_generated_label() {
        let key = merits_key();
        let voting = Voting::open(VotingId::new(), key, vec![VoteId::new()]);
        assert!(voting.is_pending());
        assert!(voting.label().starts_with("On the merits"));
        assert_eq!(voting.grouping_key(), &key);
    }

    #[test]
    fn complete_is_one_way() {
        let mut voting = Voting::open(VotingId::new(), merits_key(), vec![VoteId::new()]);
        let winner = MemberId::new();

        voting.complete(outcome(winner)).unwrap();
        assert!(voting.is_completed());
        assert_eq!(voting.outcome().unwrap().winning_member_id, winner);

        let err = voting.complete(outcome(winner)).unwrap_err();
        assert_eq!(
            err.code,
            crate::domain::foundation::ErrorCode::InvalidState
        );
    }

    #[test]
    fn absorb_votes_extends_membership() {
        let mut voting = Voting::open(VotingId::new(), merits_key(), vec![VoteId::new()]);
        let extra = VoteId::new();
        voting.absorb_votes([extra]);
        assert!(voting.contains_vote(&extra));
        assert_eq!(voting.vote_ids().len(), 2);
    }
}
