//! HTTP DTOs for docket-entry endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::docket::{KnowledgeType, MemberRole, Tallies, Voting};
use crate::domain::foundation::{DocketStatus, DomainError, MemberId, VotingStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Requested case status, with the payload the status carries.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatusRequest {
    OnDocket,
    Suspended,
    UnderInquiry { deadline_days: u32 },
    ViewRequested { member_id: String },
}

impl CaseStatusRequest {
    pub fn into_status(self) -> Result<DocketStatus, DomainError> {
        Ok(match self {
            CaseStatusRequest::OnDocket => DocketStatus::OnDocket,
            CaseStatusRequest::Suspended => DocketStatus::Suspended,
            CaseStatusRequest::UnderInquiry { deadline_days } => {
                DocketStatus::UnderInquiry { deadline_days }
            }
            CaseStatusRequest::ViewRequested { member_id } => DocketStatus::ViewRequested {
                member_id: member_id.parse::<MemberId>().map_err(|_| {
                    DomainError::validation("member_id", "Invalid member ID format")
                })?,
            },
        })
    }
}

/// Request to cast (or supersede with) a vote.
#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteRequest {
    pub member_id: String,
    pub role: MemberRole,
    pub knowledge_type: KnowledgeType,
    pub preliminary_decision_id: Option<String>,
    pub merits_decision_id: Option<String>,
    pub ex_officio_decision_id: Option<String>,
    pub rationale: Option<String>,
}

/// Request to complete a voting with its outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteVotingRequest {
    pub winning_member_id: String,
    #[serde(default)]
    pub deciding_vote_used: bool,
    pub deciding_vote_member_id: Option<String>,
    pub tallies: Tallies,
    pub final_text: Option<String>,
}

/// Request to finalize the judgment of an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeJudgmentRequest {
    pub binding_voting_id: String,
    pub minutes: Option<String>,
    #[serde(default)]
    pub acknowledge_pending: bool,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response after casting a vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteCastResponse {
    pub vote_id: String,
}

/// Response after superseding a vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteSupersededResponse {
    pub old_vote_id: String,
    pub new_vote_id: String,
}

/// One voting of an entry, summarized.
#[derive(Debug, Clone, Serialize)]
pub struct VotingSummaryResponse {
    pub voting_id: String,
    pub status: VotingStatus,
    pub vote_count: usize,
}

impl From<&Voting> for VotingSummaryResponse {
    fn from(voting: &Voting) -> Self {
        Self {
            voting_id: voting.id().to_string(),
            status: voting.status(),
            vote_count: voting.vote_ids().len(),
        }
    }
}

/// Response after a grouping pass.
#[derive(Debug, Clone, Serialize)]
pub struct GroupVotesResponse {
    pub opened_voting_ids: Vec<String>,
    pub votings: Vec<VotingSummaryResponse>,
}

/// Response after completing a voting.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteVotingResponse {
    pub voting_id: String,
    /// True when the recorded tallies do not add up.
    pub tally_warning: bool,
}

/// Response after finalizing a judgment.
#[derive(Debug, Clone, Serialize)]
pub struct JudgmentResponse {
    pub judgment_id: String,
    pub binding_voting_id: String,
}
