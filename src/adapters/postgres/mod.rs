//! PostgreSQL adapters - database implementations of the repository
//! ports.
//!
//! All three repositories guard updates with the aggregate version
//! and rely on unique constraints for the allocation invariants
//! (session ordinal, decision number, one decision per judgment).

mod decision_repository;
mod docket_entry_repository;
mod session_repository;

pub use decision_repository::PostgresDecisionRepository;
pub use docket_entry_repository::PostgresDocketEntryRepository;
pub use session_repository::PostgresSessionRepository;
