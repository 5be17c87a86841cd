//! Docket module - cases under judgment, their vote ledger and votings.

mod aggregate;
mod judgment;
mod vote;
mod voting;

pub use aggregate::DocketEntry;
pub use judgment::Judgment;
pub use vote::{GroupingKey, KnowledgeType, MemberRole, Vote, VoteSelection};
pub use voting::{DecidingVote, Tallies, Voting, VotingOutcome};
