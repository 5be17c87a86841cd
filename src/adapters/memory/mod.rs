//! In-memory adapters - used by tests and local wiring.

mod decision_repository;
mod decision_text_registry;
mod docket_entry_repository;
mod event_bus;
mod member_registry;
mod session_repository;

pub use decision_repository::InMemoryDecisionRepository;
pub use decision_text_registry::InMemoryDecisionTextRegistry;
pub use docket_entry_repository::InMemoryDocketEntryRepository;
pub use event_bus::InMemoryEventBus;
pub use member_registry::InMemoryMemberRegistry;
pub use session_repository::InMemorySessionRepository;
