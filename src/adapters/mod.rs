//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST API endpoint groups
//! - `memory` - In-memory implementations for tests and local runs
//! - `postgres` - PostgreSQL-backed repositories

pub mod http;
pub mod memory;
pub mod postgres;
