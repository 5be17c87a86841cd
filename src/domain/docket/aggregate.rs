//! DocketEntry aggregate entity.
//!
//! A docket entry is one case placed on a session's agenda. It owns
//! the append-only vote ledger, the votings derived from it, and the
//! judgment that closes it. All vote-level operations go through this
//! aggregate so that grouping always sees a stable ledger.
//!
//! # Invariants
//!
//! - Votes are never deleted; a re-cast supersedes the old vote.
//! - Each vote belongs to at most one voting; grouping only ever
//!   assigns votes that are current and not yet grouped.
//! - A completed voting never absorbs later votes.
//! - At most one judgment exists; once `Judged` the entry is immutable
//!   except for its minutes text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CaseId, DocketEntryId, DocketStatus, DomainError, ErrorCode, JudgmentId, MemberId, SessionId,
    Timestamp, VoteId, VotingId,
};

use super::judgment::Judgment;
use super::vote::{GroupingKey, MemberRole, Vote, VoteSelection};
use super::voting::{DecidingVote, Tallies, Voting, VotingOutcome};

/// A case placed on a session's agenda for judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocketEntry {
    id: DocketEntryId,
    session_id: SessionId,
    case_id: CaseId,
    /// Position within the session's docket; unique per session,
    /// never reused.
    position: u32,
    status: DocketStatus,
    minutes: Option<String>,
    votes: Vec<Vote>,
    votings: Vec<Voting>,
    judgment: Option<Judgment>,
    /// Optimistic-concurrency version, managed by the repository.
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl DocketEntry {
    /// Creates a new entry at the given docket position.
    pub fn new(id: DocketEntryId, session_id: SessionId, case_id: CaseId, position: u32) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            session_id,
            case_id,
            position,
            status: DocketStatus::OnDocket,
            minutes: None,
            votes: Vec::new(),
            votings: Vec::new(),
            judgment: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute an entry from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DocketEntryId,
        session_id: SessionId,
        case_id: CaseId,
        position: u32,
        status: DocketStatus,
        minutes: Option<String>,
        votes: Vec<Vote>,
        votings: Vec<Voting>,
        judgment: Option<Judgment>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            case_id,
            position,
            status,
            minutes,
            votes,
            votings,
            judgment,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &DocketEntryId {
        &self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn case_id(&self) -> &CaseId {
        &self.case_id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn status(&self) -> &DocketStatus {
        &self.status
    }

    pub fn minutes(&self) -> Option<&str> {
        self.minutes.as_deref()
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn votings(&self) -> &[Voting] {
        &self.votings
    }

    pub fn judgment(&self) -> Option<&Judgment> {
        self.judgment.as_ref()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Advances the concurrency version after a successful
    /// version-checked write. Called by repositories only.
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn is_judged(&self) -> bool {
        self.status.is_judged()
    }

    /// Votes that have not been superseded by a re-cast.
    pub fn current_votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.iter().filter(|v| v.is_current())
    }

    /// The member's current vote, if any.
    pub fn current_vote_of(&self, member_id: &MemberId) -> Option<&Vote> {
        self.current_votes().find(|v| v.member_id() == member_id)
    }

    /// Looks up a voting by id.
    pub fn voting(&self, voting_id: &VotingId) -> Option<&Voting> {
        self.votings.iter().find(|v| v.id() == voting_id)
    }

    /// Pending votings other than the given one.
    pub fn other_pending_votings(&self, except: &VotingId) -> Vec<&Voting> {
        self.votings
            .iter()
            .filter(|v| v.is_pending() && v.id() != except)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Status changes
    // ─────────────────────────────────────────────────────────────────────

    /// Applies a plain status change (suspension, inquiry, view request,
    /// or return to the docket).
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the target is `Judged` (only judgment
    ///   finalization reaches that status) or the transition is not valid
    /// - `ValidationFailed` if an inquiry deadline is not positive
    pub fn set_status(&mut self, new_status: DocketStatus) -> Result<(), DomainError> {
        if matches!(new_status, DocketStatus::Judged) {
            return Err(DomainError::invalid_state(
                "Judged is only reachable through judgment finalization",
            )
            .with_detail("docket_entry_id", self.id.to_string()));
        }
        if let DocketStatus::UnderInquiry { deadline_days } = &new_status {
            if *deadline_days == 0 {
                return Err(DomainError::validation(
                    "deadline_days",
                    "Inquiry deadline must be a positive number of days",
                ));
            }
        }
        if !self.status.can_transition_to(&new_status) {
            return Err(DomainError::invalid_state("Status change is not allowed")
                .with_detail("docket_entry_id", self.id.to_string())
                .with_detail("current_status", self.status.to_string())
                .with_detail("attempted_status", new_status.to_string()));
        }

        self.status = new_status;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Updates the minutes text. Allowed even after judgment.
    pub fn set_minutes(&mut self, minutes: Option<String>) {
        self.minutes = minutes;
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Vote ledger
    // ─────────────────────────────────────────────────────────────────────

    /// Appends a vote to the ledger.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is already judged
    /// - `Conflict` if the member already has a current vote
    ///   (re-casting requires the explicit supersede operation)
    pub fn cast_vote(
        &mut self,
        member_id: MemberId,
        role: MemberRole,
        selection: VoteSelection,
        rationale: Option<String>,
    ) -> Result<&Vote, DomainError> {
        self.ensure_not_judged("cast a vote")?;

        if self.current_vote_of(&member_id).is_some() {
            return Err(DomainError::conflict(
                "Member already has a current vote for this case",
            )
            .with_detail("docket_entry_id", self.id.to_string())
            .with_detail("member_id", member_id.to_string()));
        }

        let vote = Vote::cast(VoteId::new(), member_id, role, selection, rationale);
        self.votes.push(vote);
        self.updated_at = Timestamp::now();
        Ok(self.votes.last().expect("vote was just pushed"))
    }

    /// Re-casts a member's vote, superseding the current one.
    ///
    /// The old vote stays in the ledger with a back-reference to the
    /// new one; grouping and tallies only ever consider current votes.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is already judged
    /// - `PreconditionFailed` if the member has no current vote
    pub fn supersede_vote(
        &mut self,
        member_id: MemberId,
        role: MemberRole,
        selection: VoteSelection,
        rationale: Option<String>,
    ) -> Result<&Vote, DomainError> {
        self.ensure_not_judged("re-cast a vote")?;

        let old_index = self
            .votes
            .iter()
            .position(|v| v.is_current() && v.member_id() == &member_id)
            .ok_or_else(|| {
                DomainError::precondition("Member has no current vote to supersede")
                    .with_detail("docket_entry_id", self.id.to_string())
                    .with_detail("member_id", member_id.to_string())
            })?;

        let new_vote = Vote::cast(VoteId::new(), member_id, role, selection, rationale);
        self.votes[old_index].mark_superseded(*new_vote.id());
        self.votes.push(new_vote);
        self.updated_at = Timestamp::now();
        Ok(self.votes.last().expect("vote was just pushed"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Grouping
    // ─────────────────────────────────────────────────────────────────────

    /// Partitions ungrouped current votes into votings by decision
    /// combination.
    ///
    /// Votes whose key matches an existing `Pending` voting join it;
    /// every other key group opens a new voting. Completed votings are
    /// never merged into: a vote cast after completion starts a fresh
    /// group on the next pass. Re-running with no newly cast votes is
    /// a no-op, so callers may safely retry.
    ///
    /// Returns the ids of newly opened votings.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is already judged
    pub fn group_votes(&mut self) -> Result<Vec<VotingId>, DomainError> {
        self.ensure_not_judged("group votes")?;

        let grouped: HashSet<VoteId> = self
            .votings
            .iter()
            .flat_map(|v| v.vote_ids().iter().copied())
            .collect();

        // Partition the ungrouped current votes, preserving cast order.
        let mut keys: Vec<GroupingKey> = Vec::new();
        let mut groups: Vec<Vec<VoteId>> = Vec::new();
        for vote in self.votes.iter().filter(|v| v.is_current()) {
            if grouped.contains(vote.id()) {
                continue;
            }
            let key = vote.selection().grouping_key();
            match keys.iter().position(|k| *k == key) {
                Some(i) => groups[i].push(*vote.id()),
                None => {
                    keys.push(key);
                    groups.push(vec![*vote.id()]);
                }
            }
        }

        let mut opened = Vec::new();
        for (key, vote_ids) in keys.into_iter().zip(groups) {
            let pending = self
                .votings
                .iter_mut()
                .find(|v| v.is_pending() && *v.grouping_key() == key);
            match pending {
                Some(voting) => voting.absorb_votes(vote_ids),
                None => {
                    let voting_id = VotingId::new();
                    self.votings.push(Voting::open(voting_id, key, vote_ids));
                    opened.push(voting_id);
                }
            }
        }

        if !opened.is_empty() {
            self.updated_at = Timestamp::now();
        }
        Ok(opened)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Resolution
    // ─────────────────────────────────────────────────────────────────────

    /// Completes a voting with its binding tally.
    ///
    /// Tallies are stored as the operator supplied them; the returned
    /// flag is `true` when they do not add up, which callers surface
    /// as a warning rather than a failure.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the entry is judged or the voting already
    ///   completed
    /// - `VotingNotFound` if the voting does not belong to this entry
    /// - `ValidationFailed` if the winner is not among the voting's
    ///   current member votes
    pub fn complete_voting(
        &mut self,
        voting_id: &VotingId,
        winning_member_id: MemberId,
        deciding_vote: DecidingVote,
        tallies: Tallies,
        final_text: Option<String>,
    ) -> Result<bool, DomainError> {
        self.ensure_not_judged("complete a voting")?;

        let member_vote_ids: HashSet<VoteId> = self
            .current_votes()
            .filter(|v| v.member_id() == &winning_member_id)
            .map(|v| *v.id())
            .collect();

        let voting = self
            .votings
            .iter_mut()
            .find(|v| v.id() == voting_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::VotingNotFound, "Voting not found for this case")
                    .with_detail("docket_entry_id", self.id.to_string())
                    .with_detail("voting_id", voting_id.to_string())
            })?;

        let winner_in_voting = voting
            .vote_ids()
            .iter()
            .any(|id| member_vote_ids.contains(id));
        if !winner_in_voting {
            return Err(DomainError::validation(
                "winning_member_id",
                "Winning member has no vote in this voting",
            )
            .with_detail("voting_id", voting_id.to_string())
            .with_detail("member_id", winning_member_id.to_string()));
        }

        voting.complete(VotingOutcome {
            winning_member_id,
            tallies,
            deciding_vote,
            final_text,
            completed_at: Timestamp::now(),
        })?;

        self.updated_at = Timestamp::now();
        Ok(!tallies.is_consistent())
    }

    /// Closes the entry with a judgment bound to a completed voting.
    ///
    /// # Errors
    ///
    /// - `PreconditionFailed` if a judgment already exists, the binding
    ///   voting is missing or not completed, or other votings are still
    ///   pending and the caller did not acknowledge them
    pub fn finalize_judgment(
        &mut self,
        binding_voting_id: VotingId,
        minutes: Option<String>,
        acknowledge_pending: bool,
    ) -> Result<&Judgment, DomainError> {
        if self.judgment.is_some() {
            return Err(
                DomainError::precondition("Case has already been judged")
                    .with_detail("docket_entry_id", self.id.to_string()),
            );
        }

        let binding = self.voting(&binding_voting_id).ok_or_else(|| {
            DomainError::precondition("Binding voting does not belong to this case")
                .with_detail("docket_entry_id", self.id.to_string())
                .with_detail("voting_id", binding_voting_id.to_string())
        })?;
        if !binding.is_completed() {
            return Err(
                DomainError::precondition("Binding voting has not been completed")
                    .with_detail("voting_id", binding_voting_id.to_string())
                    .with_detail("current_status", binding.status().to_string()),
            );
        }

        let pending = self.other_pending_votings(&binding_voting_id);
        if !pending.is_empty() && !acknowledge_pending {
            let ids: Vec<String> = pending.iter().map(|v| v.id().to_string()).collect();
            return Err(DomainError::precondition(
                "Other votings are still pending; resolve them or acknowledge to proceed",
            )
            .with_detail("docket_entry_id", self.id.to_string())
            .with_detail("pending_voting_ids", ids.join(",")));
        }

        self.judgment = Some(Judgment::new(
            JudgmentId::new(),
            self.id,
            binding_voting_id,
            minutes,
        ));
        self.status = DocketStatus::Judged;
        self.updated_at = Timestamp::now();
        Ok(self.judgment.as_ref().expect("judgment was just set"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────

    fn ensure_not_judged(&self, action: &str) -> Result<(), DomainError> {
        if self.is_judged() {
            Err(
                DomainError::invalid_state(format!("Cannot {} on a judged case", action))
                    .with_detail("docket_entry_id", self.id.to_string())
                    .with_detail("current_status", self.status.to_string()),
            )
        } else {
            Ok(())
        }
    }
}
