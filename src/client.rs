//! Client handle for one Atlas API deployment.

use crate::errors::Error;
use crate::http::{self, ApiResponse, RequestInput};

/// Hosted API location used when no override is given.
pub const API_URL: &str = "https://api.atlas.earth/v0";

/// Carries the API base URL and an optional API key.
///
/// Cheap to clone; the resource modules borrow a handle to build endpoint
/// requests and clone it into page query functions.
#[derive(Clone)]
pub struct Atlas {
    api_url: String,
    key: Option<String>,
}

impl Atlas {
    pub fn new(api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| API_URL.to_string());
        Atlas { api_url, key: None }
    }

    /// Attaches an API key, sent as `authorization: api-key <key>`.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issues a request, attaching the stored key unless the input opts out
    /// with `with_credentials(false)`.
    #[tracing::instrument(skip(self, input))]
    pub async fn request(&self, mut input: RequestInput) -> Result<ApiResponse, Error> {
        if let Some(key) = &self.key {
            if input.with_credentials != Some(false) {
                input = input.header("authorization", format!("api-key {}", key));
            }
        }
        http::request(input).await
    }
}
