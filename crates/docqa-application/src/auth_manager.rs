//! Authenticated session state machine.
//!
//! Drives register → OTP-verify → (auto-)login → authenticated, plus
//! startup token validation and logout. Owns the [`Session`] value
//! exclusively; every other component only reads the token through the
//! shared [`TokenStore`].

use std::sync::Arc;

use tokio::sync::RwLock;

use docqa_core::api::{AuthApi, LoginOutcome};
use docqa_core::error::{DocqaError, Result};
use docqa_core::session::{AuthStatus, Credentials, PendingVerification, Session, TokenStore};

/// State machine for the credential/OTP handshake against the auth API.
///
/// All transitions are edge-triggered by user actions, with one exception:
/// [`verify_session`](Self::verify_session) runs once at startup when a
/// persisted token exists. There is no automatic retry anywhere; every
/// transition requires a new explicit action.
pub struct AuthSessionManager {
    /// The session value owned by this manager.
    session: RwLock<Session>,
    /// Credentials retained while an OTP verification is pending.
    pending: RwLock<Option<PendingVerification>>,
    /// Auth API collaborator.
    auth_api: Arc<dyn AuthApi>,
    /// Durable token holder, written on login and cleared on logout.
    token_store: Arc<dyn TokenStore>,
}

impl AuthSessionManager {
    pub fn new(auth_api: Arc<dyn AuthApi>, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            session: RwLock::new(Session::anonymous()),
            pending: RwLock::new(None),
            auth_api,
            token_store,
        }
    }

    /// Returns the current authentication status.
    pub async fn status(&self) -> AuthStatus {
        self.session.read().await.status
    }

    /// Returns a snapshot of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Whether an OTP verification is pending for retained credentials.
    pub async fn has_pending_verification(&self) -> bool {
        self.pending.read().await.is_some()
    }

    /// Registers a new account.
    ///
    /// On success the server sends an OTP email; the manager transitions
    /// to `OtpPending` and retains the credentials for the auto-login that
    /// follows OTP verification. On failure the state returns to `Anon`,
    /// any retained credentials are dropped, and the server detail is
    /// surfaced to the caller.
    ///
    /// # Errors
    ///
    /// - `Validation` when either field is empty
    /// - `ServerRejection`/`Network` from the registration request
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        self.set_status(AuthStatus::Registering).await;

        match self.auth_api.register(email, password).await {
            Ok(()) => {
                *self.pending.write().await = Some(PendingVerification::new(credentials));
                self.set_status(AuthStatus::OtpPending).await;
                Ok("Registration successful. Check your email for the verification code."
                    .to_string())
            }
            Err(err) => {
                self.reset_to_anonymous().await;
                Err(err)
            }
        }
    }

    /// Attempts a login.
    ///
    /// Two server outcomes are possible: a direct token issue transitions
    /// to `Authenticated` and persists the token; an OTP demand transitions
    /// to `OtpPending` with the credentials retained. Any rejection returns
    /// the state to `Anon`. Retained credentials live only while the state
    /// is `OtpPending`, so both the direct-success and rejection paths drop
    /// them.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthStatus> {
        let credentials = Credentials::new(email, password);
        credentials.validate()?;

        self.set_status(AuthStatus::Authenticating).await;

        match self.auth_api.login(email, password).await {
            Ok(LoginOutcome::Authenticated { access_token }) => {
                self.complete_login(access_token).await?;
                Ok(AuthStatus::Authenticated)
            }
            Ok(LoginOutcome::OtpRequired) => {
                *self.pending.write().await = Some(PendingVerification::new(credentials));
                self.set_status(AuthStatus::OtpPending).await;
                Ok(AuthStatus::OtpPending)
            }
            Err(err) => {
                self.reset_to_anonymous().await;
                Err(err)
            }
        }
    }

    /// Submits the one-time passcode and completes the login.
    ///
    /// This is a non-atomic two-phase commit: OTP verification and the
    /// follow-up login are separate requests. When verification succeeds
    /// but the login fails, the manager returns to `OtpPending` with the
    /// retained credentials intact so the user can retry without
    /// re-entering them. Partial completion is recoverable, not fatal.
    ///
    /// # Errors
    ///
    /// - `Validation` when the OTP is empty
    /// - `AuthState` when no verification is pending
    /// - `ServerRejection`/`Network` from either request
    pub async fn verify_otp(&self, otp: &str) -> Result<()> {
        if otp.trim().is_empty() {
            return Err(DocqaError::validation("Verification code is required."));
        }

        let pending = self
            .pending
            .read()
            .await
            .clone()
            .ok_or_else(|| DocqaError::auth_state("No verification is pending."))?;

        self.set_status(AuthStatus::VerifyingOtp).await;

        if let Err(err) = self
            .auth_api
            .verify_otp(pending.email(), otp.trim())
            .await
        {
            self.set_status(AuthStatus::OtpPending).await;
            return Err(err);
        }

        // Auto-login with the retained credentials.
        let credentials = &pending.credentials;
        match self
            .auth_api
            .login(&credentials.email, &credentials.password)
            .await
        {
            Ok(LoginOutcome::Authenticated { access_token }) => {
                self.complete_login(access_token).await?;
                Ok(())
            }
            Ok(LoginOutcome::OtpRequired) => {
                // Verified but the server still demands a code; keep the
                // retry path open.
                self.set_status(AuthStatus::OtpPending).await;
                Err(DocqaError::auth_state(
                    "Verification incomplete. Request a new code and try again.",
                ))
            }
            Err(err) => {
                self.set_status(AuthStatus::OtpPending).await;
                Err(err)
            }
        }
    }

    /// Requests a fresh OTP email for the pending verification.
    ///
    /// # Errors
    ///
    /// `AuthState` when no verification is pending.
    pub async fn resend_otp(&self) -> Result<()> {
        let pending = self
            .pending
            .read()
            .await
            .clone()
            .ok_or_else(|| DocqaError::auth_state("No verification is pending."))?;

        self.auth_api.resend_otp(pending.email()).await
    }

    /// Logs out unconditionally, from any state.
    ///
    /// The local state is reset to `Anon` before the store is touched, so
    /// even a failing disk write cannot leave a phantom authenticated
    /// session.
    pub async fn logout(&self) -> Result<()> {
        self.reset_to_anonymous().await;
        self.token_store.clear().await
    }

    /// Validates a persisted token at startup.
    ///
    /// Returns `Ok(true)` and transitions to `Authenticated` when the
    /// server confirms the token. Any failure, explicit or network-level,
    /// clears the token and leaves the state `Anon`; the user simply lands
    /// back at the login screen, so no error is raised.
    pub async fn verify_session(&self) -> Result<bool> {
        let Some(token) = self.token_store.get().await else {
            return Ok(false);
        };

        match self.auth_api.verify_token(&token).await {
            Ok(true) => {
                *self.session.write().await = Session::authenticated(token);
                Ok(true)
            }
            Ok(false) => {
                tracing::debug!("stored token rejected by server, clearing");
                self.discard_token().await
            }
            Err(err) => {
                tracing::debug!("token validation failed: {err}, clearing");
                self.discard_token().await
            }
        }
    }

    async fn discard_token(&self) -> Result<bool> {
        self.token_store.clear().await?;
        self.reset_to_anonymous().await;
        Ok(false)
    }

    /// Completes a successful login: the token is persisted, the session
    /// becomes authenticated, and any retained credentials are dropped.
    async fn complete_login(&self, token: String) -> Result<()> {
        self.token_store.set(token.clone()).await?;
        *self.session.write().await = Session::authenticated(token);
        *self.pending.write().await = None;
        Ok(())
    }

    async fn reset_to_anonymous(&self) {
        *self.session.write().await = Session::anonymous();
        *self.pending.write().await = None;
    }

    async fn set_status(&self, status: AuthStatus) {
        self.session.write().await.status = status;
    }
}
