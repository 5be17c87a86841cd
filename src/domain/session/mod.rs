//! Session module - hearing sessions and their dockets.

mod aggregate;

pub use aggregate::{DocketPublication, Session};
