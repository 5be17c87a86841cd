//! Decision-text registry port - lookup of canonical decision texts.
//!
//! Preliminary, merits, and ex-officio decision texts are curated
//! outside the engine. Votes reference them by ID; the engine only
//! needs existence checks and the canonical text to pre-fill a vote's
//! rationale.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::docket::KnowledgeType;
use crate::domain::foundation::{DecisionTextId, DomainError};

/// A canonical decision text as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionText {
    pub id: DecisionTextId,
    /// Which vote track this text belongs to.
    pub knowledge_type: KnowledgeType,
    pub title: String,
    pub body: String,
}

/// Read-only port over the canonical decision-text catalog.
#[async_trait]
pub trait DecisionTextRegistry: Send + Sync {
    /// Look up a decision text by ID.
    ///
    /// Returns `None` if unknown.
    async fn find_by_id(&self, id: &DecisionTextId) -> Result<Option<DecisionText>, DomainError>;
}
