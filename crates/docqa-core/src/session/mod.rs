//! Session domain module.
//!
//! Contains the session model, conversation message types, and the token
//! store trait.

pub mod message;
pub mod model;
pub mod token;

pub use message::{ChatMessage, MessageRole};
pub use model::{AuthStatus, Credentials, PendingVerification, Session};
pub use token::TokenStore;
