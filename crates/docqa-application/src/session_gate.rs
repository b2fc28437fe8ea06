//! Composition root.
//!
//! Wires the session manager, chat controller, and reference resolver
//! around one token store and one API client, and gates access to the
//! conversation components until the session is authenticated.

use std::sync::Arc;

use docqa_core::api::{AuthApi, QnaApi};
use docqa_core::error::{DocqaError, Result};
use docqa_core::session::{AuthStatus, TokenStore};

use crate::auth_manager::AuthSessionManager;
use crate::chat_controller::ChatController;
use crate::reference_resolver::ReferenceResolver;

/// Entry point for the client: holds the component graph and exposes the
/// conversation pieces only while authenticated.
pub struct SessionGate {
    auth: Arc<AuthSessionManager>,
    chat: Arc<ChatController>,
    references: Arc<ReferenceResolver>,
}

impl SessionGate {
    /// Builds the full component graph over one shared token store.
    pub fn new(
        auth_api: Arc<dyn AuthApi>,
        qna_api: Arc<dyn QnaApi>,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        let references = Arc::new(ReferenceResolver::new(qna_api.clone(), token_store.clone()));
        let chat = Arc::new(ChatController::new(
            qna_api,
            token_store.clone(),
            references.clone(),
        ));
        let auth = Arc::new(AuthSessionManager::new(auth_api, token_store));

        Self {
            auth,
            chat,
            references,
        }
    }

    /// Runs the one-time startup validation of a persisted token.
    ///
    /// Must complete before any ask is issued; it is skipped internally
    /// when no token exists. Returns the resulting status.
    pub async fn startup(&self) -> Result<AuthStatus> {
        self.auth.verify_session().await?;
        Ok(self.auth.status().await)
    }

    /// Current authentication status.
    pub async fn status(&self) -> AuthStatus {
        self.auth.status().await
    }

    /// The session manager is reachable in every state; login and
    /// registration have to work while anonymous.
    pub fn auth(&self) -> &Arc<AuthSessionManager> {
        &self.auth
    }

    /// Returns the chat controller, only while authenticated.
    ///
    /// # Errors
    ///
    /// `AuthState` when the session is not authenticated.
    pub async fn chat(&self) -> Result<Arc<ChatController>> {
        self.require_authenticated().await?;
        Ok(self.chat.clone())
    }

    /// Returns the reference resolver, only while authenticated.
    ///
    /// # Errors
    ///
    /// `AuthState` when the session is not authenticated.
    pub async fn references(&self) -> Result<Arc<ReferenceResolver>> {
        self.require_authenticated().await?;
        Ok(self.references.clone())
    }

    async fn require_authenticated(&self) -> Result<()> {
        if self.auth.status().await != AuthStatus::Authenticated {
            return Err(DocqaError::auth_state("You must be logged in."));
        }
        Ok(())
    }
}
