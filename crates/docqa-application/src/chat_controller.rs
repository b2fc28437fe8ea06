//! Chat interaction controller.
//!
//! Owns the ordered message sequence and drives the ask/save request
//! cycle. The loading flag is a concurrency guard, not just a UI
//! affordance: a second ask issued while one is in flight is rejected,
//! never queued, so answers cannot interleave out of submission order.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use docqa_core::api::QnaApi;
use docqa_core::error::{DocqaError, Result};
use docqa_core::reference::SavedExchange;
use docqa_core::session::{ChatMessage, TokenStore};

use crate::reference_resolver::ReferenceResolver;

/// Manages the exchanged messages and the ask/save request cycle.
///
/// Messages are append-only in conversation order and live only as long
/// as the controller; they are not persisted across restarts (the backend
/// keeps its own saved history).
pub struct ChatController {
    /// Ordered conversation, append-only.
    messages: RwLock<Vec<ChatMessage>>,
    /// True while an ask request is in flight. Doubles as the mutex that
    /// serializes submissions.
    loading: Mutex<bool>,
    qna_api: Arc<dyn QnaApi>,
    token_store: Arc<dyn TokenStore>,
    /// The evidence panel is cleared whenever a new question is asked.
    resolver: Arc<ReferenceResolver>,
}

impl ChatController {
    pub fn new(
        qna_api: Arc<dyn QnaApi>,
        token_store: Arc<dyn TokenStore>,
        resolver: Arc<ReferenceResolver>,
    ) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            loading: Mutex::new(false),
            qna_api,
            token_store,
            resolver,
        }
    }

    /// Returns a snapshot of the conversation.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.messages.read().await.clone()
    }

    /// Whether an ask request is currently in flight.
    pub async fn is_loading(&self) -> bool {
        *self.loading.lock().await
    }

    /// The question id of the most recent answer that has one, if any.
    /// This is the id the "view sources" affordance resolves against.
    pub async fn last_question_id(&self) -> Option<i64> {
        self.messages
            .read()
            .await
            .iter()
            .rev()
            .find_map(|message| message.question_id)
    }

    /// Submits a question.
    ///
    /// The user's own message is appended synchronously before any network
    /// I/O, so it is always visible immediately regardless of latency or
    /// failure. Ask failures become bot messages carrying the error
    /// detail; a save failure is logged and swallowed, since losing a
    /// history entry is non-fatal to the conversation.
    ///
    /// # Errors
    ///
    /// `Busy` when a previous ask has not resolved yet. All other failures
    /// are folded into the conversation rather than returned.
    pub async fn ask(&self, question: &str) -> Result<()> {
        let question = question.trim().to_string();
        if question.is_empty() {
            return Ok(());
        }

        let token = {
            // Hold the guard across the preconditions so a double
            // submission cannot slip in between check and set.
            let mut loading = self.loading.lock().await;
            if *loading {
                return Err(DocqaError::Busy);
            }

            let Some(token) = self.token_store.get().await else {
                self.push(ChatMessage::bot(
                    "You must be logged in to ask questions.",
                    None,
                ))
                .await;
                return Ok(());
            };

            self.push(ChatMessage::user(question.clone())).await;
            self.resolver.clear().await;
            *loading = true;
            token
        };

        match self.qna_api.ask(&token, &question).await {
            Ok(outcome) => {
                self.push(ChatMessage::bot(outcome.answer.clone(), outcome.question_id))
                    .await;

                // Best-effort history save: never surfaced, never retried.
                if let Err(err) = self
                    .qna_api
                    .save_exchange(&token, &question, &outcome.answer)
                    .await
                {
                    tracing::warn!("failed to save exchange: {err}");
                }
            }
            Err(err) => {
                self.push(ChatMessage::bot(err.user_message(), None)).await;
            }
        }

        *self.loading.lock().await = false;
        Ok(())
    }

    /// Lists the exchanges previously saved server-side.
    pub async fn saved(&self) -> Result<Vec<SavedExchange>> {
        let token = self.require_token().await?;
        self.qna_api.saved_exchanges(&token).await
    }

    /// Deletes a saved exchange by id.
    pub async fn delete_saved(&self, id: i64) -> Result<()> {
        let token = self.require_token().await?;
        self.qna_api.delete_saved(&token, id).await
    }

    async fn require_token(&self) -> Result<String> {
        self.token_store
            .get()
            .await
            .ok_or(DocqaError::MissingToken)
    }

    async fn push(&self, message: ChatMessage) {
        self.messages.write().await.push(message);
    }
}
