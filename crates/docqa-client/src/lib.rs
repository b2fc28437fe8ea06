//! HTTP client for the document QA backend.
//!
//! [`ApiClient`] implements the `AuthApi` and `QnaApi` traits from
//! `docqa-core` over reqwest. Response normalization (missing snippets,
//! placeholder document names, absent answers) happens in the DTO layer so
//! the rest of the application only sees canonical shapes.

mod client;
mod dto;

pub use client::ApiClient;
