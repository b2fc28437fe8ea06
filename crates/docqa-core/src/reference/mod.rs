//! Reference (evidence) domain module.

pub mod model;

pub use model::{Reference, SavedExchange};
