//! EventPublisher port - interface for publishing domain events.
//!
//! The engine emits domain events (vote cast, voting completed,
//! judgment finalized, decision published, ...) without knowing the
//! transport. Subscribers handle notification fan-out; the engine
//! itself never sends notifications.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - `publish_all` is atomic where the adapter supports it
/// - Errors are propagated to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish multiple events.
    ///
    /// Adapters without atomic batching publish sequentially with
    /// best-effort delivery.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
