//! Docket command handlers - vote ledger, grouping, resolution,
//! judgment.

mod cast_vote;
mod complete_voting;
mod finalize_judgment;
mod group_votes;
mod supersede_vote;

pub use cast_vote::{
    CastVoteCommand, CastVoteError, CastVoteHandler, CastVoteResult, VoteCastEvent,
};
pub use complete_voting::{
    CompleteVotingCommand, CompleteVotingError, CompleteVotingHandler, CompleteVotingResult,
    VotingCompletedEvent,
};
pub use finalize_judgment::{
    FinalizeJudgmentCommand, FinalizeJudgmentError, FinalizeJudgmentHandler,
    FinalizeJudgmentResult, JudgmentFinalizedEvent,
};
pub use group_votes::{
    GroupVotesCommand, GroupVotesError, GroupVotesHandler, GroupVotesResult, VotesGroupedEvent,
};
pub use supersede_vote::{
    SupersedeVoteCommand, SupersedeVoteError, SupersedeVoteHandler, SupersedeVoteResult,
    VoteSupersededEvent,
};
