//! Collaborator traits for the remote QA backend.
//!
//! The backend is stateless and bearer-token based; these traits describe
//! its interface without committing to a transport. The HTTP
//! implementation lives in `docqa-client`; tests provide mocks.

use async_trait::async_trait;

use crate::error::Result;
use crate::reference::{Reference, SavedExchange};

/// Result of a login attempt, distinguished by the server response shape.
///
/// Modeled as a tagged variant rather than probing for field presence:
/// the server either issues a token directly or demands OTP verification
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The server issued a bearer token.
    Authenticated { access_token: String },
    /// The account is not verified yet; an OTP was sent out-of-band.
    OtpRequired,
}

/// Result of a successful ask request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    /// The synthesized answer text.
    pub answer: String,
    /// Backend identifier of the stored question, when supplied.
    pub question_id: Option<i64>,
    /// References returned inline with the answer, if any. The resolver
    /// re-fetches on demand; these are not folded into the active set.
    pub references: Vec<Reference>,
}

/// Authentication endpoints: credential/OTP handshake and token validation.
///
/// None of these carry a bearer token except `verify_token`, which is
/// validating one.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Registers a new account. The server sends an OTP email on success.
    async fn register(&self, email: &str, password: &str) -> Result<()>;

    /// Attempts a login; see [`LoginOutcome`] for the two success shapes.
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome>;

    /// Submits the one-time passcode for the given email.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<()>;

    /// Requests a fresh OTP email for an unverified account.
    async fn resend_otp(&self, email: &str) -> Result<()>;

    /// Validates an existing token against the server.
    async fn verify_token(&self, token: &str) -> Result<bool>;
}

/// Question-answering endpoints. All operations carry the bearer token.
#[async_trait]
pub trait QnaApi: Send + Sync {
    /// Submits a question and returns the answer.
    async fn ask(&self, token: &str, question: &str) -> Result<AskOutcome>;

    /// Persists an exchange server-side. Best-effort from the caller's
    /// perspective; failures are logged, never retried.
    async fn save_exchange(&self, token: &str, question: &str, answer: &str) -> Result<()>;

    /// Fetches the evidence tied to a specific answered question.
    async fn references_by_question(&self, token: &str, question_id: i64)
        -> Result<Vec<Reference>>;

    /// Fetches evidence/snippets associated with a document name.
    async fn references_by_source(&self, token: &str, source: &str) -> Result<Vec<Reference>>;

    /// Lists the caller's saved exchanges.
    async fn saved_exchanges(&self, token: &str) -> Result<Vec<SavedExchange>>;

    /// Deletes a saved exchange by id.
    async fn delete_saved(&self, token: &str, id: i64) -> Result<()>;
}
