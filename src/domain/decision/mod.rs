//! Decision module - publishable decisions and their publication history.

mod aggregate;
mod publication;

pub use aggregate::Decision;
pub use publication::Publication;
