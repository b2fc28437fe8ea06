//! HTTP implementation of the backend API traits.
//!
//! Every authorized request carries `Authorization: Bearer <token>`. Non-2xx
//! responses are mapped by extracting the FastAPI-style `{"detail": ...}`
//! body so server validation messages reach the user verbatim.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use docqa_core::api::{AskOutcome, AuthApi, LoginOutcome, QnaApi};
use docqa_core::config::ApiConfig;
use docqa_core::error::{DocqaError, Result};
use docqa_core::reference::{Reference, SavedExchange};

use crate::dto::{
    AskRequest, AskResponse, LoginRequest, LoginResponse, ReferencesResponse, RegisterRequest,
    SaveRequest, StoriesResponse, VerifyOtpRequest, VerifyTokenResponse,
};

/// Client for the remote QA backend.
///
/// Cheap to clone; the inner reqwest client pools connections.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client against the given backend configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Creates a client using `DOCQA_API_BASE` (or the local default).
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|err| DocqaError::internal(format!("Failed to parse server response: {err}")))
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn register(&self, email: &str, password: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/register"))
            .json(&RegisterRequest { email, password });
        self.send(request).await?;
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let request = self
            .client
            .post(self.url("/login"))
            .json(&LoginRequest { email, password });
        let response = self.send(request).await?;
        let parsed: LoginResponse = Self::parse(response).await?;
        parsed.into_outcome()
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/verify-otp"))
            .json(&VerifyOtpRequest { email, otp });
        self.send(request).await?;
        Ok(())
    }

    async fn resend_otp(&self, email: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/resend-otp"))
            .query(&[("email", email)]);
        self.send(request).await?;
        Ok(())
    }

    async fn verify_token(&self, token: &str) -> Result<bool> {
        let request = self
            .client
            .get(self.url("/verify-token"))
            .bearer_auth(token);
        let response = self.send(request).await?;
        let parsed: VerifyTokenResponse = Self::parse(response).await?;
        Ok(parsed.valid)
    }
}

#[async_trait]
impl QnaApi for ApiClient {
    async fn ask(&self, token: &str, question: &str) -> Result<AskOutcome> {
        let request = self
            .client
            .post(self.url("/ask"))
            .bearer_auth(token)
            .json(&AskRequest { question });
        let response = self.send(request).await?;
        let parsed: AskResponse = Self::parse(response).await?;
        Ok(parsed.into_outcome())
    }

    async fn save_exchange(&self, token: &str, question: &str, answer: &str) -> Result<()> {
        let request = self
            .client
            .post(self.url("/save"))
            .bearer_auth(token)
            .json(&SaveRequest { question, answer });
        self.send(request).await?;
        Ok(())
    }

    async fn references_by_question(
        &self,
        token: &str,
        question_id: i64,
    ) -> Result<Vec<Reference>> {
        let request = self
            .client
            .get(self.url(&format!("/question/{}/references", question_id)))
            .bearer_auth(token);
        let response = self.send(request).await?;
        let parsed: ReferencesResponse = Self::parse(response).await?;
        Ok(parsed.references)
    }

    async fn references_by_source(&self, token: &str, source: &str) -> Result<Vec<Reference>> {
        let request = self
            .client
            .get(self.url("/stories-by-source"))
            .query(&[("source", source)])
            .bearer_auth(token);
        let response = self.send(request).await?;
        let parsed: StoriesResponse = Self::parse(response).await?;
        Ok(parsed.stories)
    }

    async fn saved_exchanges(&self, token: &str) -> Result<Vec<SavedExchange>> {
        let request = self.client.get(self.url("/saved")).bearer_auth(token);
        let response = self.send(request).await?;
        Self::parse(response).await
    }

    async fn delete_saved(&self, token: &str, id: i64) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/saved/{}", id)))
            .bearer_auth(token);
        self.send(request).await?;
        Ok(())
    }
}

fn map_transport_error(err: reqwest::Error) -> DocqaError {
    tracing::debug!("transport failure: {err}");
    DocqaError::network(err.to_string())
}

/// Extracts the server-supplied detail message from an error body.
///
/// FastAPI reports errors as `{"detail": "..."}`; request-validation
/// failures carry a structured detail, which is rendered as JSON. An
/// unparseable body is passed through as-is.
fn map_http_error(status: StatusCode, body: &str) -> DocqaError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("detail").map(|detail| match detail.as_str() {
                Some(text) => text.to_string(),
                None => detail.to_string(),
            })
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("Request failed with status {}", status.as_u16())
            } else {
                body.to_string()
            }
        });

    DocqaError::server_rejection(status.as_u16(), detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_is_extracted_verbatim() {
        let err = map_http_error(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Invalid email or password"}"#,
        );
        match err {
            DocqaError::ServerRejection { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Invalid email or password");
            }
            other => panic!("Expected ServerRejection, got {:?}", other),
        }
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"loc": ["body", "email"], "msg": "field required"}]}"#,
        );
        match err {
            DocqaError::ServerRejection { detail, .. } => {
                assert!(detail.contains("field required"));
            }
            other => panic!("Expected ServerRejection, got {:?}", other),
        }
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        match err {
            DocqaError::ServerRejection { detail, .. } => {
                assert_eq!(detail, "Request failed with status 500");
            }
            other => panic!("Expected ServerRejection, got {:?}", other),
        }
    }

    #[test]
    fn non_json_body_passes_through() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        match err {
            DocqaError::ServerRejection { detail, .. } => {
                assert_eq!(detail, "upstream exploded");
            }
            other => panic!("Expected ServerRejection, got {:?}", other),
        }
    }
}
