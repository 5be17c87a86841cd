//! HTTP handlers for docket-entry endpoints.
//!
//! Case status, the vote ledger, grouping, voting completion, and
//! judgment finalization.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::docket::{
    CastVoteCommand, CastVoteError, CastVoteHandler, CompleteVotingCommand, CompleteVotingError,
    CompleteVotingHandler, FinalizeJudgmentCommand, FinalizeJudgmentError, FinalizeJudgmentHandler,
    GroupVotesCommand, GroupVotesError, GroupVotesHandler, SupersedeVoteCommand,
    SupersedeVoteError, SupersedeVoteHandler,
};
use crate::application::handlers::session::{
    SetCaseStatusCommand, SetCaseStatusError, SetCaseStatusHandler,
};
use crate::domain::foundation::{DecisionTextId, DocketEntryId, MemberId, VotingId};
use crate::ports::{
    DecisionTextRegistry, DocketEntryRepository, EventPublisher, MemberRegistry, SessionRepository,
};

use super::super::actor::Actor;
use super::super::error::ApiError;
use super::dto::{
    CaseStatusRequest, CastVoteRequest, CompleteVotingRequest, CompleteVotingResponse,
    FinalizeJudgmentRequest, GroupVotesResponse, JudgmentResponse, VoteCastResponse,
    VoteSupersededResponse, VotingSummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for docket-entry endpoints.
#[derive(Clone)]
pub struct DocketAppState {
    pub session_repository: Arc<dyn SessionRepository>,
    pub entry_repository: Arc<dyn DocketEntryRepository>,
    pub member_registry: Arc<dyn MemberRegistry>,
    pub text_registry: Arc<dyn DecisionTextRegistry>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl DocketAppState {
    fn set_case_status_handler(&self) -> SetCaseStatusHandler {
        SetCaseStatusHandler::new(
            self.session_repository.clone(),
            self.entry_repository.clone(),
            self.member_registry.clone(),
            self.event_publisher.clone(),
        )
    }

    fn cast_vote_handler(&self) -> CastVoteHandler {
        CastVoteHandler::new(
            self.entry_repository.clone(),
            self.member_registry.clone(),
            self.text_registry.clone(),
            self.event_publisher.clone(),
        )
    }

    fn supersede_vote_handler(&self) -> SupersedeVoteHandler {
        SupersedeVoteHandler::new(self.entry_repository.clone(), self.event_publisher.clone())
    }

    fn group_votes_handler(&self) -> GroupVotesHandler {
        GroupVotesHandler::new(self.entry_repository.clone(), self.event_publisher.clone())
    }

    fn complete_voting_handler(&self) -> CompleteVotingHandler {
        CompleteVotingHandler::new(self.entry_repository.clone(), self.event_publisher.clone())
    }

    fn finalize_judgment_handler(&self) -> FinalizeJudgmentHandler {
        FinalizeJudgmentHandler::new(self.entry_repository.clone(), self.event_publisher.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

fn parse_entry_id(s: &str) -> Result<DocketEntryId, ApiError> {
    s.parse()
        .map_err(|_| ApiError::bad_request("Invalid docket entry ID format"))
}

fn parse_optional_text_id(s: Option<String>, field: &str) -> Result<Option<DecisionTextId>, ApiError> {
    s.map(|s| {
        s.parse::<DecisionTextId>()
            .map_err(|_| ApiError::bad_request(format!("Invalid {} format", field)))
    })
    .transpose()
}

/// PUT /api/docket-entries/:id/status - Change the case status
pub async fn set_case_status(
    State(state): State<DocketAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
    Json(request): Json<CaseStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;
    let new_status = request.into_status()?;

    state
        .set_case_status_handler()
        .handle(
            SetCaseStatusCommand {
                docket_entry_id,
                new_status,
            },
            actor.metadata(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/docket-entries/:id/votes - Cast a vote
pub async fn cast_vote(
    State(state): State<DocketAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
    Json(request): Json<CastVoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;
    let member_id: MemberId = request
        .member_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid member ID format"))?;

    let result = state
        .cast_vote_handler()
        .handle(
            CastVoteCommand {
                docket_entry_id,
                member_id,
                role: request.role,
                knowledge_type: request.knowledge_type,
                preliminary_decision: parse_optional_text_id(
                    request.preliminary_decision_id,
                    "preliminary decision ID",
                )?,
                merits_decision: parse_optional_text_id(
                    request.merits_decision_id,
                    "merits decision ID",
                )?,
                ex_officio_decision: parse_optional_text_id(
                    request.ex_officio_decision_id,
                    "ex-officio decision ID",
                )?,
                rationale: request.rationale,
            },
            actor.metadata(),
        )
        .await?;

    let response = VoteCastResponse {
        vote_id: result.vote_id.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/docket-entries/:id/votes/supersede - Replace a member's vote
pub async fn supersede_vote(
    State(state): State<DocketAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
    Json(request): Json<CastVoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;
    let member_id: MemberId = request
        .member_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid member ID format"))?;

    let result = state
        .supersede_vote_handler()
        .handle(
            SupersedeVoteCommand {
                docket_entry_id,
                member_id,
                role: request.role,
                knowledge_type: request.knowledge_type,
                preliminary_decision: parse_optional_text_id(
                    request.preliminary_decision_id,
                    "preliminary decision ID",
                )?,
                merits_decision: parse_optional_text_id(
                    request.merits_decision_id,
                    "merits decision ID",
                )?,
                ex_officio_decision: parse_optional_text_id(
                    request.ex_officio_decision_id,
                    "ex-officio decision ID",
                )?,
                rationale: request.rationale,
            },
            actor.metadata(),
        )
        .await?;

    let response = VoteSupersededResponse {
        old_vote_id: result.old_vote_id.to_string(),
        new_vote_id: result.new_vote_id.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/docket-entries/:id/group-votes - Run a grouping pass
pub async fn group_votes(
    State(state): State<DocketAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;

    let result = state
        .group_votes_handler()
        .handle(GroupVotesCommand { docket_entry_id }, actor.metadata())
        .await?;

    let response = GroupVotesResponse {
        opened_voting_ids: result
            .opened_voting_ids
            .iter()
            .map(|id| id.to_string())
            .collect(),
        votings: result.votings.iter().map(VotingSummaryResponse::from).collect(),
    };
    Ok(Json(response))
}

/// POST /api/docket-entries/:id/votings/:voting_id/complete - Record the outcome
pub async fn complete_voting(
    State(state): State<DocketAppState>,
    Path((entry_id, voting_id)): Path<(String, String)>,
    actor: Actor,
    Json(request): Json<CompleteVotingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;
    let voting_id: VotingId = voting_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid voting ID format"))?;
    let winning_member_id: MemberId = request
        .winning_member_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid member ID format"))?;
    let deciding_vote_member_id = request
        .deciding_vote_member_id
        .map(|s| {
            s.parse::<MemberId>()
                .map_err(|_| ApiError::bad_request("Invalid member ID format"))
        })
        .transpose()?;

    let result = state
        .complete_voting_handler()
        .handle(
            CompleteVotingCommand {
                docket_entry_id,
                voting_id,
                winning_member_id,
                deciding_vote_used: request.deciding_vote_used,
                deciding_vote_member_id,
                tallies: request.tallies,
                final_text: request.final_text,
            },
            actor.metadata(),
        )
        .await?;

    let response = CompleteVotingResponse {
        voting_id: voting_id.to_string(),
        tally_warning: result.tally_warning,
    };
    Ok(Json(response))
}

/// POST /api/docket-entries/:id/judgment - Finalize the judgment
pub async fn finalize_judgment(
    State(state): State<DocketAppState>,
    Path(entry_id): Path<String>,
    actor: Actor,
    Json(request): Json<FinalizeJudgmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let docket_entry_id = parse_entry_id(&entry_id)?;
    let binding_voting_id: VotingId = request
        .binding_voting_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid voting ID format"))?;

    let result = state
        .finalize_judgment_handler()
        .handle(
            FinalizeJudgmentCommand {
                docket_entry_id,
                binding_voting_id,
                minutes: request.minutes,
                acknowledge_pending: request.acknowledge_pending,
            },
            actor.metadata(),
        )
        .await?;

    let response = JudgmentResponse {
        judgment_id: result.judgment.id().to_string(),
        binding_voting_id: result.judgment.binding_voting_id().to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<SetCaseStatusError> for ApiError {
    fn from(err: SetCaseStatusError) -> Self {
        match err {
            SetCaseStatusError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            SetCaseStatusError::SessionNotFound(id) => {
                ApiError::not_found(format!("Session not found: {}", id))
            }
            SetCaseStatusError::Domain(e) => e.into(),
        }
    }
}

impl From<CastVoteError> for ApiError {
    fn from(err: CastVoteError) -> Self {
        match err {
            CastVoteError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            CastVoteError::Domain(e) => e.into(),
        }
    }
}

impl From<SupersedeVoteError> for ApiError {
    fn from(err: SupersedeVoteError) -> Self {
        match err {
            SupersedeVoteError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            SupersedeVoteError::Domain(e) => e.into(),
        }
    }
}

impl From<GroupVotesError> for ApiError {
    fn from(err: GroupVotesError) -> Self {
        match err {
            GroupVotesError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            GroupVotesError::Domain(e) => e.into(),
        }
    }
}

impl From<CompleteVotingError> for ApiError {
    fn from(err: CompleteVotingError) -> Self {
        match err {
            CompleteVotingError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            CompleteVotingError::Domain(e) => e.into(),
        }
    }
}

impl From<FinalizeJudgmentError> for ApiError {
    fn from(err: FinalizeJudgmentError) -> Self {
        match err {
            FinalizeJudgmentError::EntryNotFound(id) => {
                ApiError::not_found(format!("Docket entry not found: {}", id))
            }
            FinalizeJudgmentError::Domain(e) => e.into(),
        }
    }
}
