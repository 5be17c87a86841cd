//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionRepository` / `DocketEntryRepository` / `DecisionRepository`
//!   - aggregate persistence (write side)
//! - `EventPublisher` - domain event fan-out
//! - `MemberRegistry` - read-only board roster lookup
//! - `DecisionTextRegistry` - read-only canonical decision texts

mod decision_repository;
mod decision_text_registry;
mod docket_entry_repository;
mod event_publisher;
mod member_registry;
mod session_repository;

pub use decision_repository::DecisionRepository;
pub use decision_text_registry::{DecisionText, DecisionTextRegistry};
pub use docket_entry_repository::DocketEntryRepository;
pub use event_publisher::EventPublisher;
pub use member_registry::{Member, MemberRegistry};
pub use session_repository::SessionRepository;
