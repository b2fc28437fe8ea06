//! Token store trait.

use async_trait::async_trait;

use crate::error::Result;

/// Durable holder of the current bearer token.
///
/// This is plain shared state, not versioned: write/clear operations are
/// immediately visible to any other component reading the store. No
/// validation of token shape is performed locally; validity is determined
/// only by server responses.
///
/// Mutated only by the session manager (set on successful login/auto-login,
/// cleared on logout or failed startup verification) and read by every
/// other component.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, or `None` when logged out.
    async fn get(&self) -> Option<String>;

    /// Stores a freshly issued token.
    async fn set(&self, token: String) -> Result<()>;

    /// Removes the stored token.
    async fn clear(&self) -> Result<()>;
}
