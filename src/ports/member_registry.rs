//! Member registry port - read-only lookup of board members.
//!
//! Member administration lives outside the engine; this port only
//! answers existence and identity questions when votes are cast or a
//! session's panel is set.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MemberId};

/// A board member as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    /// True while the member may sit on panels and vote.
    pub active: bool,
}

/// Read-only port over the board's member roster.
#[async_trait]
pub trait MemberRegistry: Send + Sync {
    /// Look up a member by ID.
    ///
    /// Returns `None` if unknown.
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError>;

    /// Check that every given member exists and is active.
    ///
    /// Returns the IDs that failed the check (empty when all pass).
    async fn missing_or_inactive(&self, ids: &[MemberId]) -> Result<Vec<MemberId>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_registry_is_object_safe() {
        fn _accepts_dyn(_registry: &dyn MemberRegistry) {}
    }
}
