//! In-memory decision-text registry for testing and local wiring.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::docket::KnowledgeType;
use crate::domain::foundation::{DecisionTextId, DomainError};
use crate::ports::{DecisionText, DecisionTextRegistry};

/// In-memory `DecisionTextRegistry` seeded by tests or local wiring.
pub struct InMemoryDecisionTextRegistry {
    texts: RwLock<HashMap<DecisionTextId, DecisionText>>,
}

impl InMemoryDecisionTextRegistry {
    pub fn new() -> Self {
        Self {
            texts: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a canonical text, returning its ID.
    pub fn register(
        &self,
        knowledge_type: KnowledgeType,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> DecisionTextId {
        let id = DecisionTextId::new();
        self.texts
            .write()
            .expect("InMemoryDecisionTextRegistry: lock poisoned")
            .insert(
                id,
                DecisionText {
                    id,
                    knowledge_type,
                    title: title.into(),
                    body: body.into(),
                },
            );
        id
    }
}

impl Default for InMemoryDecisionTextRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionTextRegistry for InMemoryDecisionTextRegistry {
    async fn find_by_id(&self, id: &DecisionTextId) -> Result<Option<DecisionText>, DomainError> {
        Ok(self
            .texts
            .read()
            .expect("InMemoryDecisionTextRegistry: lock poisoned")
            .get(id)
            .cloned())
    }
}
