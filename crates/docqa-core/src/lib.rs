pub mod api;
pub mod config;
pub mod error;
pub mod reference;
pub mod session;

// Re-export common error type
pub use error::DocqaError;
