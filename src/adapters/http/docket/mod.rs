//! Docket-entry HTTP endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::DocketAppState;
pub use routes::docket_router;
