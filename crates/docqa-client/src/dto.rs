//! Wire types for the QA backend.
//!
//! Responses are normalized into the canonical domain shapes here, at the
//! client boundary, rather than ad hoc in each caller: missing snippet
//! collections become empty, missing document names fall back to a
//! placeholder, and a missing answer becomes an explicit notice.

use serde::{Deserialize, Serialize};

use docqa_core::api::{AskOutcome, LoginOutcome};
use docqa_core::error::{DocqaError, Result};
use docqa_core::reference::Reference;

#[derive(Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Raw login response; the server either issues a token or sets the
/// `otp_needed` flag. Converted into the tagged [`LoginOutcome`] so no
/// downstream code probes field presence.
#[derive(Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub otp_needed: Option<bool>,
}

impl LoginResponse {
    pub fn into_outcome(self) -> Result<LoginOutcome> {
        if self.otp_needed == Some(true) {
            return Ok(LoginOutcome::OtpRequired);
        }
        match self.access_token {
            Some(access_token) => Ok(LoginOutcome::Authenticated { access_token }),
            None => Err(DocqaError::internal(
                "Login response carried neither a token nor an OTP flag",
            )),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct VerifyTokenResponse {
    #[serde(default)]
    pub valid: bool,
}

#[derive(Serialize)]
pub(crate) struct AskRequest<'a> {
    pub question: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub question_id: Option<i64>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl AskResponse {
    pub fn into_outcome(self) -> AskOutcome {
        AskOutcome {
            answer: self
                .answer
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "No answer returned.".to_string()),
            question_id: self.question_id,
            references: self.references,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct SaveRequest<'a> {
    pub question: &'a str,
    pub answer: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct ReferencesResponse {
    #[serde(default)]
    pub references: Vec<Reference>,
}

#[derive(Deserialize)]
pub(crate) struct StoriesResponse {
    #[serde(default)]
    pub stories: Vec<Reference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_with_otp_flag_is_otp_required() {
        let raw: LoginResponse =
            serde_json::from_str(r#"{"otp_needed": true, "message": "OTP sent"}"#).unwrap();
        assert_eq!(raw.into_outcome().unwrap(), LoginOutcome::OtpRequired);
    }

    #[test]
    fn login_response_with_token_is_authenticated() {
        let raw: LoginResponse =
            serde_json::from_str(r#"{"access_token": "tok", "token_type": "bearer", "otp_needed": false}"#)
                .unwrap();
        assert_eq!(
            raw.into_outcome().unwrap(),
            LoginOutcome::Authenticated {
                access_token: "tok".to_string()
            }
        );
    }

    #[test]
    fn empty_login_response_is_an_error() {
        let raw: LoginResponse = serde_json::from_str("{}").unwrap();
        assert!(raw.into_outcome().is_err());
    }

    #[test]
    fn missing_answer_becomes_notice() {
        let raw: AskResponse = serde_json::from_str(r#"{"question_id": 3}"#).unwrap();
        let outcome = raw.into_outcome();
        assert_eq!(outcome.answer, "No answer returned.");
        assert_eq!(outcome.question_id, Some(3));
    }

    #[test]
    fn references_normalize_missing_fields() {
        let raw: ReferencesResponse =
            serde_json::from_str(r#"{"references": [{"document_id": 1}]}"#).unwrap();
        assert_eq!(raw.references[0].document_name, "Document");
        assert!(raw.references[0].snippets.is_empty());
    }

    #[test]
    fn stories_share_the_reference_shape() {
        let raw: StoriesResponse = serde_json::from_str(
            r#"{"stories": [{"document_id": 2, "document_name": "a.pdf", "snippets": ["s"]}]}"#,
        )
        .unwrap();
        assert_eq!(raw.stories[0].document_name, "a.pdf");
    }
}
