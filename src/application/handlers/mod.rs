//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through the
//! ports, grouped by aggregate.

pub mod decision;
pub mod docket;
pub mod session;
