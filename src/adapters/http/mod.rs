//! HTTP adapters - REST API implementations.
//!
//! Each endpoint group has its own router and state; the error and
//! actor modules are shared across all of them.

pub mod actor;
pub mod decision;
pub mod docket;
pub mod error;
pub mod session;

// Re-export key types for convenience
pub use actor::Actor;
pub use decision::{decision_router, DecisionAppState};
pub use docket::{docket_router, DocketAppState};
pub use error::{ApiError, ErrorResponse};
pub use session::{session_router, SessionAppState};
