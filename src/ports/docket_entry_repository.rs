//! Docket entry repository port (write side).

use crate::domain::docket::DocketEntry;
use crate::domain::foundation::{CaseId, DocketEntryId, DomainError, JudgmentId, SessionId};
use async_trait::async_trait;

/// Repository port for DocketEntry aggregate persistence.
///
/// The entry is stored with its full vote ledger, votings, and
/// judgment; implementations must write the whole aggregate in one
/// transaction and enforce optimistic concurrency on `update`.
#[async_trait]
pub trait DocketEntryRepository: Send + Sync {
    /// Save a new docket entry.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the case is already on the session's docket
    /// - `DatabaseError` on persistence failure
    async fn save(&self, entry: &DocketEntry) -> Result<(), DomainError>;

    /// Update an existing entry, bumping its version.
    ///
    /// # Errors
    ///
    /// - `DocketEntryNotFound` if the entry doesn't exist
    /// - `Conflict` if the stored version has moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, entry: &DocketEntry) -> Result<(), DomainError>;

    /// Find an entry by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DocketEntryId) -> Result<Option<DocketEntry>, DomainError>;

    /// Find the entry holding a given case within a session.
    async fn find_by_session_and_case(
        &self,
        session_id: &SessionId,
        case_id: &CaseId,
    ) -> Result<Option<DocketEntry>, DomainError>;

    /// Find all entries of a session, ordered by docket position.
    async fn find_by_session(&self, session_id: &SessionId)
        -> Result<Vec<DocketEntry>, DomainError>;

    /// Find the entry that owns a given judgment.
    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<DocketEntry>, DomainError>;

    /// Delete an entry (used when a case is removed from the docket).
    ///
    /// # Errors
    ///
    /// - `DocketEntryNotFound` if the entry doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: &DocketEntryId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docket_entry_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn DocketEntryRepository) {}
    }
}
