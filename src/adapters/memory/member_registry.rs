//! In-memory member registry for testing and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberId};
use crate::ports::{Member, MemberRegistry};

/// In-memory `MemberRegistry` seeded by tests or local wiring.
pub struct InMemoryMemberRegistry {
    members: RwLock<HashMap<MemberId, Member>>,
}

impl InMemoryMemberRegistry {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a member, returning its ID for convenience.
    pub fn register(&self, name: impl Into<String>, active: bool) -> MemberId {
        let id = MemberId::new();
        self.members
            .write()
            .expect("InMemoryMemberRegistry: lock poisoned")
            .insert(
                id,
                Member {
                    id,
                    name: name.into(),
                    active,
                },
            );
        id
    }
}

impl Default for InMemoryMemberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberRegistry for InMemoryMemberRegistry {
    async fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .expect("InMemoryMemberRegistry: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn missing_or_inactive(&self, ids: &[MemberId]) -> Result<Vec<MemberId>, DomainError> {
        let members = self
            .members
            .read()
            .expect("InMemoryMemberRegistry: lock poisoned");
        Ok(ids
            .iter()
            .filter(|id| !members.get(id).map(|m| m.active).unwrap_or(false))
            .copied()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flags_missing_and_inactive_members() {
        let registry = InMemoryMemberRegistry::new();
        let active = registry.register("Dr. Silva", true);
        let inactive = registry.register("Dr. Rocha", false);
        let unknown = MemberId::new();

        let failed = registry
            .missing_or_inactive(&[active, inactive, unknown])
            .await
            .unwrap();
        assert_eq!(failed, vec![inactive, unknown]);

        assert!(registry.find_by_id(&active).await.unwrap().is_some());
        assert!(registry.find_by_id(&unknown).await.unwrap().is_none());
    }
}
