//! Session HTTP endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::SessionAppState;
pub use routes::session_router;
