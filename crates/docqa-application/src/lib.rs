//! Application layer: the session state machine and the chat interaction
//! controller, composed behind [`SessionGate`].

pub mod auth_manager;
pub mod chat_controller;
pub mod reference_resolver;
pub mod session_gate;

pub use auth_manager::AuthSessionManager;
pub use chat_controller::ChatController;
pub use reference_resolver::ReferenceResolver;
pub use session_gate::SessionGate;
