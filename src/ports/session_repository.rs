//! Session repository port (write side).
//!
//! Defines the contract for persisting and retrieving Session aggregates.
//! Implementations handle the actual database operations.

use crate::domain::foundation::{DomainError, SessionId};
use crate::domain::session::Session;
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
///
/// Implementations must enforce optimistic concurrency on `update`:
/// the write only applies when the stored version matches the
/// aggregate's version, and fails with `Conflict` otherwise.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a session with the same ordinal and year exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Update an existing session, bumping its version.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    /// - `Conflict` if the stored version has moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Find all sessions for a given year, ordered by ordinal.
    async fn find_by_year(&self, year: i32) -> Result<Vec<Session>, DomainError>;

    /// Allocate the next session ordinal for a year.
    ///
    /// Must be atomic with respect to concurrent allocations.
    async fn next_ordinal(&self, year: i32) -> Result<u32, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }
}
