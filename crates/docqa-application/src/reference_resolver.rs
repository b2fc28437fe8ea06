//! On-demand evidence resolution.
//!
//! Holds the single "open evidence panel": at most one active reference
//! set, replaced wholesale on each resolve call, never merged.

use std::sync::Arc;

use tokio::sync::RwLock;

use docqa_core::api::QnaApi;
use docqa_core::error::{DocqaError, Result};
use docqa_core::reference::Reference;
use docqa_core::session::TokenStore;

/// Resolves references lazily, either for an answered question or for a
/// clicked source name.
///
/// Token problems here are logged and returned to the caller but never
/// touch the session state machine: a rejected reference fetch is not a
/// logout trigger (only startup verification is allowed to clear tokens).
pub struct ReferenceResolver {
    /// The active reference set; empty when no panel is open.
    active: RwLock<Vec<Reference>>,
    qna_api: Arc<dyn QnaApi>,
    token_store: Arc<dyn TokenStore>,
}

impl ReferenceResolver {
    pub fn new(qna_api: Arc<dyn QnaApi>, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            active: RwLock::new(Vec::new()),
            qna_api,
            token_store,
        }
    }

    /// Returns a snapshot of the active reference set.
    pub async fn active(&self) -> Vec<Reference> {
        self.active.read().await.clone()
    }

    /// Empties the active reference set (panel closed).
    pub async fn clear(&self) {
        self.active.write().await.clear();
    }

    /// Fetches the evidence tied to a specific answered question and
    /// replaces the active set with it.
    pub async fn load_by_question(&self, question_id: i64) -> Result<Vec<Reference>> {
        let token = self.require_token().await?;
        match self.qna_api.references_by_question(&token, question_id).await {
            Ok(references) => {
                *self.active.write().await = references.clone();
                Ok(references)
            }
            Err(err) => {
                tracing::error!("failed to load references for question {question_id}: {err}");
                Err(err)
            }
        }
    }

    /// Fetches everything from a named source and replaces the active set,
    /// letting the user pivot from "evidence for this answer" to
    /// "everything from this document" without a new question.
    pub async fn load_by_source(&self, source: &str) -> Result<Vec<Reference>> {
        let token = self.require_token().await?;
        match self.qna_api.references_by_source(&token, source).await {
            Ok(references) => {
                *self.active.write().await = references.clone();
                Ok(references)
            }
            Err(err) => {
                tracing::error!("failed to load references for source {source:?}: {err}");
                Err(err)
            }
        }
    }

    async fn require_token(&self) -> Result<String> {
        match self.token_store.get().await {
            Some(token) => Ok(token),
            None => {
                tracing::error!("reference fetch attempted without a session token");
                Err(DocqaError::MissingToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docqa_core::api::AskOutcome;
    use docqa_core::reference::SavedExchange;
    use docqa_infrastructure::InMemoryTokenStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockQnaApi {
        by_question: Mutex<Option<Result<Vec<Reference>>>>,
        by_source: Mutex<Option<Result<Vec<Reference>>>>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl QnaApi for MockQnaApi {
        async fn ask(&self, _token: &str, _question: &str) -> Result<AskOutcome> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn save_exchange(&self, _token: &str, _q: &str, _a: &str) -> Result<()> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn references_by_question(
            &self,
            _token: &str,
            _question_id: i64,
        ) -> Result<Vec<Reference>> {
            *self.calls.lock().unwrap() += 1;
            self.by_question
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn references_by_source(&self, _token: &str, _source: &str) -> Result<Vec<Reference>> {
            *self.calls.lock().unwrap() += 1;
            self.by_source
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn saved_exchanges(&self, _token: &str) -> Result<Vec<SavedExchange>> {
            unimplemented!("not exercised by resolver tests")
        }

        async fn delete_saved(&self, _token: &str, _id: i64) -> Result<()> {
            unimplemented!("not exercised by resolver tests")
        }
    }

    fn reference(id: i64, name: &str) -> Reference {
        Reference {
            document_id: id,
            document_name: name.to_string(),
            snippets: vec!["...".to_string()],
        }
    }

    #[tokio::test]
    async fn load_by_question_replaces_the_active_set() {
        let api = Arc::new(MockQnaApi::default());
        *api.by_question.lock().unwrap() = Some(Ok(vec![reference(1, "doc.pdf")]));
        let store = Arc::new(InMemoryTokenStore::with_token("tok"));
        let resolver = ReferenceResolver::new(api.clone(), store);

        let loaded = resolver.load_by_question(42).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(resolver.active().await, loaded);

        // A second resolve replaces, never merges.
        *api.by_question.lock().unwrap() = Some(Ok(vec![reference(2, "other.pdf")]));
        resolver.load_by_question(43).await.unwrap();
        let active = resolver.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].document_id, 2);
    }

    #[tokio::test]
    async fn load_by_source_replaces_the_active_set() {
        let api = Arc::new(MockQnaApi::default());
        *api.by_question.lock().unwrap() = Some(Ok(vec![reference(1, "doc.pdf")]));
        *api.by_source.lock().unwrap() =
            Some(Ok(vec![reference(3, "doc.pdf"), reference(4, "doc.pdf")]));
        let store = Arc::new(InMemoryTokenStore::with_token("tok"));
        let resolver = ReferenceResolver::new(api, store);

        resolver.load_by_question(42).await.unwrap();
        resolver.load_by_source("doc.pdf").await.unwrap();

        let active = resolver.active().await;
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].document_id, 3);
    }

    #[tokio::test]
    async fn missing_token_is_an_error_and_skips_the_network() {
        let api = Arc::new(MockQnaApi::default());
        let store = Arc::new(InMemoryTokenStore::new());
        let resolver = ReferenceResolver::new(api.clone(), store);

        let err = resolver.load_by_question(1).await.unwrap_err();
        assert!(err.is_missing_token());
        assert_eq!(*api.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_the_active_set_untouched() {
        let api = Arc::new(MockQnaApi::default());
        *api.by_question.lock().unwrap() = Some(Ok(vec![reference(1, "doc.pdf")]));
        let store = Arc::new(InMemoryTokenStore::with_token("tok"));
        let resolver = ReferenceResolver::new(api.clone(), store);

        resolver.load_by_question(42).await.unwrap();
        *api.by_question.lock().unwrap() =
            Some(Err(DocqaError::server_rejection(404, "Question not found")));

        assert!(resolver.load_by_question(99).await.is_err());
        assert_eq!(resolver.active().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_panel() {
        let api = Arc::new(MockQnaApi::default());
        *api.by_question.lock().unwrap() = Some(Ok(vec![reference(1, "doc.pdf")]));
        let store = Arc::new(InMemoryTokenStore::with_token("tok"));
        let resolver = ReferenceResolver::new(api, store);

        resolver.load_by_question(42).await.unwrap();
        resolver.clear().await;
        assert!(resolver.active().await.is_empty());
    }
}
