//! Session aggregate entity.
//!
//! A session is one hearing event of the board. It holds the docket
//! (ordered case entries) by id and governs the session lifecycle:
//! docket publication, conclusion, cancellation.
//!
//! # Ownership
//!
//! Sessions reference docket entries by ID but do NOT own them.
//! Entries, their votes and votings are managed by the docket module.

use crate::domain::foundation::{
    DocketEntryId, DomainError, ErrorCode, MemberId, SessionId, SessionStatus, StateMachine,
    Timestamp,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Record of the docket's official publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocketPublication {
    /// Number of the official publication vehicle.
    pub publication_number: String,
    /// Date the docket was published.
    pub publication_date: NaiveDate,
}

/// Session aggregate - one hearing event of the appeals board.
///
/// # Invariants
///
/// - Docket positions are allocated strictly increasing per session
///   and never reused, even after removals.
/// - Cases may be added or removed only while the status is
///   `AwaitingPublication` or `DocketPublished`.
/// - `Concluded` requires a non-empty docket with every entry judged;
///   the conclusion handler re-validates that against the entry store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Ordinal of the session within its year (1st, 2nd, ...).
    ordinal: u32,

    /// Calendar year the ordinal is scoped to.
    year: i32,

    /// Date of the hearing.
    session_date: NaiveDate,

    /// Current lifecycle status.
    status: SessionStatus,

    /// Official docket publication data, once published.
    docket_publication: Option<DocketPublication>,

    /// Board members participating in this session.
    member_ids: Vec<MemberId>,

    /// Optional administrative notes.
    notes: Option<String>,

    /// Docket entries in position order (not owned).
    entry_ids: Vec<DocketEntryId>,

    /// Highest docket position ever allocated for this session.
    last_position: u32,

    /// Optimistic-concurrency version, managed by the repository.
    version: u64,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Create a new session awaiting docket publication.
    pub fn new(id: SessionId, ordinal: u32, year: i32, session_date: NaiveDate) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            ordinal,
            year,
            session_date,
            status: SessionStatus::AwaitingPublication,
            docket_publication: None,
            member_ids: Vec::new(),
            notes: None,
            entry_ids: Vec::new(),
            last_position: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        ordinal: u32,
        year: i32,
        session_date: NaiveDate,
        status: SessionStatus,
        docket_publication: Option<DocketPublication>,
        member_ids: Vec<MemberId>,
        notes: Option<String>,
        entry_ids: Vec<DocketEntryId>,
        last_position: u32,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            ordinal,
            year,
            session_date,
            status,
            docket_publication,
            member_ids,
            notes,
            entry_ids,
            last_position,
            version,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn session_date(&self) -> NaiveDate {
        self.session_date
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn docket_publication(&self) -> Option<&DocketPublication> {
        self.docket_publication.as_ref()
    }

    pub fn member_ids(&self) -> &[MemberId] {
        &self.member_ids
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn entry_ids(&self) -> &[DocketEntryId] {
        &self.entry_ids
    }

    pub fn entry_count(&self) -> usize {
        self.entry_ids.len()
    }

    pub fn last_position(&self) -> u32 {
        self.last_position
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

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Registers a docket entry and allocates its position.
    ///
    /// Positions are allocated from a per-session counter inside the
    /// same update that registers the entry, never read-then-written
    /// separately.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless status is `AwaitingPublication` or
    ///   `DocketPublished`
    pub fn add_entry(&mut self, entry_id: DocketEntryId) -> Result<u32, DomainError> {
        self.ensure_docket_editable("add case")?;

        if self.entry_ids.contains(&entry_id) {
            return Err(DomainError::conflict("Case is already on this docket")
                .with_detail("session_id", self.id.to_string())
                .with_detail("docket_entry_id", entry_id.to_string()));
        }

        self.last_position += 1;
        self.entry_ids.push(entry_id);
        self.updated_at = Timestamp::now();
        Ok(self.last_position)
    }

    /// Removes a docket entry. Remaining positions are not renumbered.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the docket is no longer editable
    /// - `DocketEntryNotFound` if the entry is not on this docket
    pub fn remove_entry(&mut self, entry_id: &DocketEntryId) -> Result<(), DomainError> {
        self.ensure_docket_editable("remove case")?;

        let before = self.entry_ids.len();
        self.entry_ids.retain(|id| id != entry_id);
        if self.entry_ids.len() == before {
            return Err(DomainError::new(
                ErrorCode::DocketEntryNotFound,
                "Entry is not on this session's docket",
            )
            .with_detail("session_id", self.id.to_string())
            .with_detail("docket_entry_id", entry_id.to_string()));
        }

        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Publishes the docket, fixing its official publication data.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless status is `AwaitingPublication`
    pub fn publish_docket(
        &mut self,
        publication_number: String,
        publication_date: NaiveDate,
    ) -> Result<(), DomainError> {
        if self.status != SessionStatus::AwaitingPublication {
            return Err(self.invalid_transition("publish docket", SessionStatus::DocketPublished));
        }

        self.status = SessionStatus::DocketPublished;
        self.docket_publication = Some(DocketPublication {
            publication_number,
            publication_date,
        });
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Concludes the session.
    ///
    /// The aggregate only validates the status transition; the
    /// all-entries-judged precondition is checked by the conclusion
    /// handler against the entry store, and re-checked at commit time
    /// through the version guard.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless status is `DocketPublished`
    pub fn conclude(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Concluded) {
            return Err(self.invalid_transition("conclude session", SessionStatus::Concluded));
        }

        self.status = SessionStatus::Concluded;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Cancels the session.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the session already reached a terminal status
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&SessionStatus::Cancelled) {
            return Err(self.invalid_transition("cancel session", SessionStatus::Cancelled));
        }

        self.status = SessionStatus::Cancelled;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replaces the participating member list.
    pub fn set_members(&mut self, member_ids: Vec<MemberId>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state("Session is closed")
                .with_detail("session_id", self.id.to_string())
                .with_detail("current_status", self.status.to_string()));
        }
        self.member_ids = member_ids;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Updates administrative notes. Allowed in any status.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.updated_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────

    fn ensure_docket_editable(&self, action: &str) -> Result<(), DomainError> {
        if self.status.is_docket_editable() {
            Ok(())
        } else {
            Err(
                DomainError::invalid_state(format!("Cannot {} in the current status", action))
                    .with_detail("session_id", self.id.to_string())
                    .with_detail("current_status", self.status.to_string()),
            )
        }
    }

    fn invalid_transition(&self, action: &str, target: SessionStatus) -> DomainError {
        DomainError::invalid_state(format!("Cannot {} in the current status", action))
            .with_detail("session_id", self.id.to_string())
            .with_detail("current_status", self.status.to_string())
            .with_detail("attempted_status", target.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hearing_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    fn test_session() -> Session {
        Session::new(SessionId::new(), 4, 2025, hearing_date())
    }

    fn published_session() -> Session {
        let mut session = test_session();
        session
            .publish_docket("DO-118".to_string(), hearing_date())
            .unwrap();
        session
    }

    // Construction

    #[test]
    fn new_session_awaits_publication() {
        let session = test_session();
        assert_eq!(session.status(), SessionStatus::AwaitingPublication);
        assert!(session.entry_ids().is_empty());
        assert_eq!(session.last_position(), 0);
    }

    // Docket editing

    #[test]
    fn add_entry_allocates_sequential_positions() {
        let mut session = test_session();
        assert_eq!(session.add_entry(DocketEntryId::new()).unwrap(), 1);
        assert_eq!(session.add_entry(DocketEntryId::new()).unwrap(), 2);
        assert_eq!(session.entry_count(), 2);
    }

    #[test]
    fn add_entry_rejects_duplicate() {
        let mut session = test_session();
        let entry_id = DocketEntryId::new();
        session.add_entry(entry_id).unwrap();
        let err = session.add_entry(entry_id).unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[test]
    fn add_entry_allowed_after_docket_publication() {
        let mut session = published_session();
        assert!(session.add_entry(DocketEntryId::new()).is_ok());
    }

    #[test]
    fn add_entry_rejected_after_conclusion() {
        let mut session = published_session();
        session.conclude().unwrap();
        let err = session.add_entry(DocketEntryId::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn remove_entry_does_not_renumber() {
        let mut session = test_session();
        let first = DocketEntryId::new();
        session.add_entry(first).unwrap();
        session.add_entry(DocketEntryId::new()).unwrap();

        session.remove_entry(&first).unwrap();

        // Next allocation continues past the removed position.
        assert_eq!(session.add_entry(DocketEntryId::new()).unwrap(), 3);
    }

    #[test]
    fn remove_unknown_entry_fails() {
        let mut session = test_session();
        let err = session.remove_entry(&DocketEntryId::new()).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocketEntryNotFound);
    }

    // Lifecycle

    #[test]
    fn publish_docket_records_publication() {
        let session = published_session();
        assert_eq!(session.status(), SessionStatus::DocketPublished);
        let publication = session.docket_publication().unwrap();
        assert_eq!(publication.publication_number, "DO-118");
    }

    #[test]
    fn publish_docket_twice_fails() {
        let mut session = published_session();
        let err = session
            .publish_docket("DO-119".to_string(), hearing_date())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn conclude_requires_published_docket() {
        let mut session = test_session();
        let err = session.conclude().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(
            err.details.get("attempted_status"),
            Some(&"Concluded".to_string())
        );
    }

    #[test]
    fn cancel_works_from_either_open_status() {
        let mut session = test_session();
        assert!(session.cancel().is_ok());

        let mut session = published_session();
        assert!(session.cancel().is_ok());
    }

    #[test]
    fn cancel_fails_after_conclusion() {
        let mut session = published_session();
        session.conclude().unwrap();
        assert!(session.cancel().is_err());
    }

    #[test]
    fn set_members_rejected_on_closed_session() {
        let mut session = test_session();
        session.cancel().unwrap();
        let err = session.set_members(vec![MemberId::new()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn notes_editable_in_any_status() {
        let mut session = published_session();
        session.conclude().unwrap();
        session.set_notes(Some("minutes approved".to_string()));
        assert_eq!(session.notes(), Some("minutes approved"));
    }
}
