//! Session domain model.
//!
//! This module contains the core Session entity that represents the
//! authentication state of the client against the remote API.

use serde::{Deserialize, Serialize};

/// Authentication status of the current session.
///
/// Transitions are driven exclusively by the session manager's operations;
/// there is no terminal state, logout always returns to `Anon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthStatus {
    /// No session; the default state.
    Anon,
    /// Credentials captured, awaiting the registration response.
    Registering,
    /// Credentials captured, awaiting the login response.
    Authenticating,
    /// Registration or login indicated an OTP is required.
    OtpPending,
    /// OTP submitted, awaiting verification and auto-login.
    VerifyingOtp,
    /// A bearer token is held and was last validated or freshly issued.
    Authenticated,
}

/// The client-side view of an authenticated session.
///
/// Invariant: `status == Authenticated` iff `token` is present and was
/// last validated successfully (or freshly issued by login/OTP-verify).
/// An absent token forces `Anon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token, absent while logged out.
    pub token: Option<String>,
    /// Current authentication status.
    pub status: AuthStatus,
}

impl Session {
    /// Returns the anonymous session (no token).
    pub fn anonymous() -> Self {
        Self {
            token: None,
            status: AuthStatus::Anon,
        }
    }

    /// Returns an authenticated session holding the given token.
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            status: AuthStatus::Authenticated,
        }
    }

    /// Whether the session currently holds a validated token.
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated && self.token.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Email/password pair held only for the duration of a register, login,
/// or verify round trip. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Validates that both fields are non-empty after trimming.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            return Err(crate::error::DocqaError::validation(
                "Email and password are required.",
            ));
        }
        Ok(())
    }
}

// The password must never leak through logs or error messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credentials retained while an OTP verification is pending, so the
/// manager can auto-login immediately after OTP success without asking
/// the user to re-enter them. Cleared on success or on returning to Anon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingVerification {
    pub credentials: Credentials,
}

impl PendingVerification {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    pub fn email(&self) -> &str {
        &self.credentials.email
    }
}
