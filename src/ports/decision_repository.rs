//! Decision repository port (write side).

use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DomainError, JudgmentId};
use async_trait::async_trait;

/// Repository port for Decision aggregate persistence.
///
/// Implementations must allocate per-year decision numbers and
/// publication orders atomically with the insert that uses them, so
/// concurrent callers either serialize or fail with `Conflict` -
/// never produce duplicates.
#[async_trait]
pub trait DecisionRepository: Send + Sync {
    /// Save a new decision.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the judgment already has a decision
    /// - `DatabaseError` on persistence failure
    async fn save(&self, decision: &Decision) -> Result<(), DomainError>;

    /// Update an existing decision, bumping its version.
    ///
    /// Publications are append-only: implementations insert new
    /// publication rows and never touch existing ones.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if the decision doesn't exist
    /// - `Conflict` if the stored version has moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, decision: &Decision) -> Result<(), DomainError>;

    /// Find a decision by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &DecisionId) -> Result<Option<Decision>, DomainError>;

    /// Find the decision derived from a judgment, if one exists.
    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<Decision>, DomainError>;

    /// Allocate the next decision number for a year.
    ///
    /// Must be atomic with respect to concurrent allocations.
    async fn next_number(&self, year: i32) -> Result<u32, DomainError>;
}
