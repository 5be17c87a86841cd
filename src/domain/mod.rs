//! Domain layer - aggregates, entities, value objects, and domain events.

pub mod decision;
pub mod docket;
pub mod foundation;
pub mod session;
