//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each handler loads an aggregate, applies one domain operation, persists
//! the result, and publishes the corresponding event.

pub mod handlers;
