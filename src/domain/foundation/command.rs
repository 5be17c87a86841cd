//! Command metadata flowing through every handler.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context carried through command processing and propagated to
/// emitted events: who acted, and the correlation id of the request.
///
/// Authentication itself is an external collaborator; the engine only
/// records an opaque actor identifier for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Opaque identifier of the operator executing this command.
    pub actor_id: String,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates metadata for the given actor.
    pub fn new(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            correlation_id: None,
        }
    }

    /// Builder: add a correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Test fixture with a fixed actor and correlation id.
    pub fn test_fixture() -> Self {
        Self::new("test-clerk").with_correlation_id("test-correlation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_returns_set_value() {
        let metadata = CommandMetadata::new("clerk-1").with_correlation_id("corr-9");
        assert_eq!(metadata.correlation_id(), "corr-9");
    }

    #[test]
    fn correlation_id_generates_when_missing() {
        let metadata = CommandMetadata::new("clerk-1");
        assert!(!metadata.correlation_id().is_empty());
    }

    #[test]
    fn serialization_skips_absent_correlation() {
        let json = serde_json::to_string(&CommandMetadata::new("clerk-2")).unwrap();
        assert!(json.contains("actor_id"));
        assert!(!json.contains("correlation_id"));
    }
}
