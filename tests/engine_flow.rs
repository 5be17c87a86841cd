//! End-to-end flow over the in-memory adapters:
//! session -> docket -> votes -> votings -> judgment -> decision.

use std::sync::Arc;

use chrono::NaiveDate;

use plenum::adapters::memory::{
    InMemoryDecisionRepository, InMemoryDecisionTextRegistry, InMemoryDocketEntryRepository,
    InMemoryEventBus, InMemoryMemberRegistry, InMemorySessionRepository,
};
use plenum::application::handlers::decision::{
    CreateDecisionCommand, CreateDecisionHandler, PublishDecisionCommand, PublishDecisionError,
    PublishDecisionHandler,
};
use plenum::application::handlers::docket::{
    CastVoteCommand, CastVoteHandler, CompleteVotingCommand, CompleteVotingHandler,
    FinalizeJudgmentCommand, FinalizeJudgmentHandler, GroupVotesCommand, GroupVotesHandler,
};
use plenum::application::handlers::session::{
    AddCaseCommand, AddCaseHandler, ConcludeSessionCommand, ConcludeSessionError,
    ConcludeSessionHandler, CreateSessionCommand, CreateSessionHandler, PublishDocketCommand,
    PublishDocketHandler,
};
use plenum::domain::docket::{KnowledgeType, MemberRole, Tallies};
use plenum::domain::foundation::{
    CaseId, CommandMetadata, DecisionStatus, DocketEntryId, DocketStatus, ErrorCode, JudgmentId,
    MemberId, SessionId, SessionStatus, VotingId,
};
use plenum::ports::{DecisionRepository, DocketEntryRepository, SessionRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Engine {
    sessions: Arc<InMemorySessionRepository>,
    entries: Arc<InMemoryDocketEntryRepository>,
    decisions: Arc<InMemoryDecisionRepository>,
    members: Arc<InMemoryMemberRegistry>,
    texts: Arc<InMemoryDecisionTextRegistry>,
    events: Arc<InMemoryEventBus>,

    create_session: CreateSessionHandler,
    add_case: AddCaseHandler,
    publish_docket: PublishDocketHandler,
    conclude_session: ConcludeSessionHandler,
    cast_vote: CastVoteHandler,
    group_votes: GroupVotesHandler,
    complete_voting: CompleteVotingHandler,
    finalize_judgment: FinalizeJudgmentHandler,
    create_decision: CreateDecisionHandler,
    publish_decision: PublishDecisionHandler,
}

impl Engine {
    fn new() -> Self {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let entries = Arc::new(InMemoryDocketEntryRepository::new());
        let decisions = Arc::new(InMemoryDecisionRepository::new());
        let members = Arc::new(InMemoryMemberRegistry::new());
        let texts = Arc::new(InMemoryDecisionTextRegistry::new());
        let events = Arc::new(InMemoryEventBus::new());

        Self {
            create_session: CreateSessionHandler::new(
                sessions.clone(),
                members.clone(),
                events.clone(),
            ),
            add_case: AddCaseHandler::new(sessions.clone(), entries.clone(), events.clone()),
            publish_docket: PublishDocketHandler::new(sessions.clone(), events.clone()),
            conclude_session: ConcludeSessionHandler::new(
                sessions.clone(),
                entries.clone(),
                events.clone(),
            ),
            cast_vote: CastVoteHandler::new(
                entries.clone(),
                members.clone(),
                texts.clone(),
                events.clone(),
            ),
            group_votes: GroupVotesHandler::new(entries.clone(), events.clone()),
            complete_voting: CompleteVotingHandler::new(entries.clone(), events.clone()),
            finalize_judgment: FinalizeJudgmentHandler::new(entries.clone(), events.clone()),
            create_decision: CreateDecisionHandler::new(
                entries.clone(),
                decisions.clone(),
                events.clone(),
            ),
            publish_decision: PublishDecisionHandler::new(decisions.clone(), events.clone()),
            sessions,
            entries,
            decisions,
            members,
            texts,
            events,
        }
    }
}

fn meta() -> CommandMetadata {
    CommandMetadata::new("clerk-7").with_correlation_id("flow-test")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a session with three registered members and a published
/// docket holding `cases` entries. Returns the session id, the member
/// ids, and the docket entry ids in position order.
async fn seed_session(
    engine: &Engine,
    cases: usize,
) -> (SessionId, Vec<MemberId>, Vec<DocketEntryId>) {
    let member_ids = vec![
        engine.members.register("Reviewer Alves", true),
        engine.members.register("Reviewer Braga", true),
        engine.members.register("Chair Castro", true),
    ];

    let created = engine
        .create_session
        .handle(
            CreateSessionCommand {
                year: 2026,
                session_date: date(2026, 3, 12),
                member_ids: member_ids.clone(),
                notes: None,
            },
            meta(),
        )
        .await
        .unwrap();
    let session_id = *created.session.id();

    let mut entry_ids = Vec::new();
    for _ in 0..cases {
        let added = engine
            .add_case
            .handle(
                AddCaseCommand {
                    session_id,
                    case_id: CaseId::new(),
                },
                meta(),
            )
            .await
            .unwrap();
        entry_ids.push(*added.entry.id());
    }

    engine
        .publish_docket
        .handle(
            PublishDocketCommand {
                session_id,
                publication_number: "DOU-55".to_string(),
                publication_date: date(2026, 3, 5),
            },
            meta(),
        )
        .await
        .unwrap();

    (session_id, member_ids, entry_ids)
}

/// Casts one on-merits vote per member, all pointing at the same
/// canonical text, then groups and completes the single resulting
/// voting and finalizes the judgment. Returns the judgment id.
async fn judge_unanimously(
    engine: &Engine,
    entry_id: DocketEntryId,
    member_ids: &[MemberId],
) -> JudgmentId {
    let text = engine
        .texts
        .register(KnowledgeType::OnMerits, "Grant in full", "The appeal is granted.");

    for (n, member_id) in member_ids.iter().enumerate() {
        let role = if n == 0 {
            MemberRole::Rapporteur
        } else {
            MemberRole::Reviewer
        };
        engine
            .cast_vote
            .handle(
                CastVoteCommand {
                    docket_entry_id: entry_id,
                    member_id: *member_id,
                    role,
                    knowledge_type: KnowledgeType::OnMerits,
                    preliminary_decision: None,
                    merits_decision: Some(text),
                    ex_officio_decision: None,
                    rationale: None,
                },
                meta(),
            )
            .await
            .unwrap();
    }

    let grouped = engine
        .group_votes
        .handle(GroupVotesCommand { docket_entry_id: entry_id }, meta())
        .await
        .unwrap();
    assert_eq!(grouped.opened_voting_ids.len(), 1);
    let voting_id = grouped.opened_voting_ids[0];

    engine
        .complete_voting
        .handle(
            CompleteVotingCommand {
                docket_entry_id: entry_id,
                voting_id,
                winning_member_id: member_ids[0],
                deciding_vote_used: false,
                deciding_vote_member_id: None,
                tallies: Tallies {
                    total: 3,
                    in_favor: 3,
                    against: 0,
                    abstentions: 0,
                },
                final_text: None,
            },
            meta(),
        )
        .await
        .unwrap();

    let finalized = engine
        .finalize_judgment
        .handle(
            FinalizeJudgmentCommand {
                docket_entry_id: entry_id,
                binding_voting_id: voting_id,
                minutes: Some("Unanimous on the merits.".to_string()),
                acknowledge_pending: false,
            },
            meta(),
        )
        .await
        .unwrap();
    *finalized.judgment.id()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_flow_from_session_to_published_decision() {
    let engine = Engine::new();
    let (session_id, member_ids, entry_ids) = seed_session(&engine, 1).await;

    let judgment_id = judge_unanimously(&engine, entry_ids[0], &member_ids).await;

    let entry = engine
        .entries
        .find_by_id(&entry_ids[0])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(*entry.status(), DocketStatus::Judged);
    assert_eq!(entry.judgment().unwrap().id(), &judgment_id);

    // Decision numbered within the judgment's year
    let created = engine
        .create_decision
        .handle(
            CreateDecisionCommand {
                judgment_id,
                ementa_title: "APPEAL. MERITS. GRANTED.".to_string(),
                ementa_body: "Unanimous grant on the merits.".to_string(),
                vote_path: None,
            },
            meta(),
        )
        .await
        .unwrap();
    let decision_id = *created.decision.id();
    assert_eq!(created.decision.number(), 1);
    assert_eq!(created.decision.status(), DecisionStatus::Pending);

    // First publication carries no reason and gets order 1
    let first = engine
        .publish_decision
        .handle(
            PublishDecisionCommand {
                decision_id,
                publication_number: "DOU-60".to_string(),
                publication_date: date(2026, 3, 20),
                republish_reason: None,
            },
            meta(),
        )
        .await
        .unwrap();
    assert_eq!(first.publication.order(), 1);

    // Republication without a reason is rejected
    let err = engine
        .publish_decision
        .handle(
            PublishDecisionCommand {
                decision_id,
                publication_number: "DOU-61".to_string(),
                publication_date: date(2026, 3, 27),
                republish_reason: None,
            },
            meta(),
        )
        .await
        .unwrap_err();
    match err {
        PublishDecisionError::Domain(e) => assert_eq!(e.code, ErrorCode::ValidationFailed),
        other => panic!("expected validation failure, got {}", other),
    }

    // With a reason it appends as order 2
    let second = engine
        .publish_decision
        .handle(
            PublishDecisionCommand {
                decision_id,
                publication_number: "DOU-61".to_string(),
                publication_date: date(2026, 3, 27),
                republish_reason: Some("Material error in the published text".to_string()),
            },
            meta(),
        )
        .await
        .unwrap();
    assert_eq!(second.publication.order(), 2);

    let decision = engine
        .decisions
        .find_by_id(&decision_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(decision.status(), DecisionStatus::Republished);
    assert_eq!(decision.publications().len(), 2);

    // All judged, so the session can conclude
    let concluded = engine
        .conclude_session
        .handle(ConcludeSessionCommand { session_id }, meta())
        .await
        .unwrap();
    assert_eq!(concluded.session.status(), SessionStatus::Concluded);
    assert_eq!(concluded.event.judged_entries, 1);

    // Every stage left its event on the bus
    for event_type in [
        "session.created",
        "session.case_added",
        "session.docket_published",
        "docket.vote_cast",
        "docket.votes_grouped",
        "docket.voting_completed",
        "docket.judgment_finalized",
        "decision.created",
        "decision.published",
        "session.concluded",
    ] {
        assert!(
            engine.events.has_event(event_type),
            "missing event {}",
            event_type
        );
    }
}

#[tokio::test]
async fn divergent_votes_open_separate_votings() {
    let engine = Engine::new();
    let (_, member_ids, entry_ids) = seed_session(&engine, 1).await;
    let entry_id = entry_ids[0];

    let grant = engine
        .texts
        .register(KnowledgeType::OnMerits, "Grant", "Granted.");
    let deny = engine
        .texts
        .register(KnowledgeType::OnMerits, "Deny", "Denied.");

    for (n, member_id) in member_ids.iter().enumerate() {
        // Two members follow the rapporteur, one diverges
        let text = if n < 2 { grant } else { deny };
        engine
            .cast_vote
            .handle(
                CastVoteCommand {
                    docket_entry_id: entry_id,
                    member_id: *member_id,
                    role: if n == 0 {
                        MemberRole::Rapporteur
                    } else {
                        MemberRole::Reviewer
                    },
                    knowledge_type: KnowledgeType::OnMerits,
                    preliminary_decision: None,
                    merits_decision: Some(text),
                    ex_officio_decision: None,
                    rationale: None,
                },
                meta(),
            )
            .await
            .unwrap();
    }

    let grouped = engine
        .group_votes
        .handle(GroupVotesCommand { docket_entry_id: entry_id }, meta())
        .await
        .unwrap();
    assert_eq!(grouped.opened_voting_ids.len(), 2);
    assert_eq!(grouped.votings.len(), 2);

    // Re-running with nothing new is a no-op
    let rerun = engine
        .group_votes
        .handle(GroupVotesCommand { docket_entry_id: entry_id }, meta())
        .await
        .unwrap();
    assert!(rerun.opened_voting_ids.is_empty());
    assert!(rerun.event.is_none());

    // The majority voting resolves; the minority one stays pending and
    // must be acknowledged at finalization
    let majority: VotingId = grouped.opened_voting_ids[0];
    engine
        .complete_voting
        .handle(
            CompleteVotingCommand {
                docket_entry_id: entry_id,
                voting_id: majority,
                winning_member_id: member_ids[0],
                deciding_vote_used: false,
                deciding_vote_member_id: None,
                tallies: Tallies {
                    total: 3,
                    in_favor: 2,
                    against: 1,
                    abstentions: 0,
                },
                final_text: None,
            },
            meta(),
        )
        .await
        .unwrap();

    let unacknowledged = engine
        .finalize_judgment
        .handle(
            FinalizeJudgmentCommand {
                docket_entry_id: entry_id,
                binding_voting_id: majority,
                minutes: None,
                acknowledge_pending: false,
            },
            meta(),
        )
        .await;
    assert!(unacknowledged.is_err());

    let finalized = engine
        .finalize_judgment
        .handle(
            FinalizeJudgmentCommand {
                docket_entry_id: entry_id,
                binding_voting_id: majority,
                minutes: None,
                acknowledge_pending: true,
            },
            meta(),
        )
        .await
        .unwrap();
    assert_eq!(finalized.judgment.binding_voting_id(), &majority);
}

#[tokio::test]
async fn conclusion_requires_every_entry_judged() {
    let engine = Engine::new();
    let (session_id, member_ids, entry_ids) = seed_session(&engine, 2).await;

    judge_unanimously(&engine, entry_ids[0], &member_ids).await;

    let err = engine
        .conclude_session
        .handle(ConcludeSessionCommand { session_id }, meta())
        .await
        .unwrap_err();
    match err {
        ConcludeSessionError::Domain(e) => assert_eq!(e.code, ErrorCode::PreconditionFailed),
        other => panic!("expected PreconditionFailed, got {}", other),
    }

    judge_unanimously(&engine, entry_ids[1], &member_ids).await;

    let concluded = engine
        .conclude_session
        .handle(ConcludeSessionCommand { session_id }, meta())
        .await
        .unwrap();
    assert_eq!(concluded.event.judged_entries, 2);

    let session = engine
        .sessions
        .find_by_id(&session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status(), SessionStatus::Concluded);
}
