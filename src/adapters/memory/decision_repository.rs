//! In-memory decision repository for testing and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::decision::Decision;
use crate::domain::foundation::{DecisionId, DomainError, ErrorCode, JudgmentId};
use crate::ports::DecisionRepository;

/// In-memory `DecisionRepository` backed by a `RwLock<HashMap>`.
pub struct InMemoryDecisionRepository {
    decisions: RwLock<HashMap<DecisionId, Decision>>,
}

impl InMemoryDecisionRepository {
    pub fn new() -> Self {
        Self {
            decisions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDecisionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionRepository {
    async fn save(&self, decision: &Decision) -> Result<(), DomainError> {
        let mut decisions = self
            .decisions
            .write()
            .expect("InMemoryDecisionRepository: lock poisoned");

        let duplicate = decisions
            .values()
            .any(|d| d.judgment_id() == decision.judgment_id());
        if duplicate {
            return Err(
                DomainError::conflict("Judgment already has a decision")
                    .with_detail("judgment_id", decision.judgment_id().to_string()),
            );
        }

        decisions.insert(*decision.id(), decision.clone());
        Ok(())
    }

    async fn update(&self, decision: &Decision) -> Result<(), DomainError> {
        let mut decisions = self
            .decisions
            .write()
            .expect("InMemoryDecisionRepository: lock poisoned");

        let stored = decisions.get(decision.id()).ok_or_else(|| {
            DomainError::new(ErrorCode::DecisionNotFound, "Decision not found")
                .with_detail("decision_id", decision.id().to_string())
        })?;
        if stored.version() != decision.version() {
            return Err(DomainError::conflict(
                "Decision was modified concurrently; reload and retry",
            )
            .with_detail("decision_id", decision.id().to_string())
            .with_detail("expected_version", decision.version().to_string())
            .with_detail("stored_version", stored.version().to_string()));
        }

        let mut updated = decision.clone();
        updated.bump_version();
        decisions.insert(*decision.id(), updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &DecisionId) -> Result<Option<Decision>, DomainError> {
        Ok(self
            .decisions
            .read()
            .expect("InMemoryDecisionRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_judgment(
        &self,
        judgment_id: &JudgmentId,
    ) -> Result<Option<Decision>, DomainError> {
        Ok(self
            .decisions
            .read()
            .expect("InMemoryDecisionRepository: lock poisoned")
            .values()
            .find(|d| d.judgment_id() == judgment_id)
            .cloned())
    }

    async fn next_number(&self, year: i32) -> Result<u32, DomainError> {
        let decisions = self
            .decisions
            .read()
            .expect("InMemoryDecisionRepository: lock poisoned");
        let max = decisions
            .values()
            .filter(|d| d.year() == year)
            .map(|d| d.number())
            .max()
            .unwrap_or(0);
        Ok(max + 1)
    }
}
