//! Dehashed search client.
//!
//! One call fetches one page. Every failure mode of a single page request
//! (401, non-success status, empty body, malformed JSON, transport error)
//! collapses to `None` after being logged, so the caller simply stops
//! paginating for that input.

use crate::auth::Credentials;
use crate::error::Result;
use crate::record::SearchResponse;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Request, StatusCode};
use spectral_core::config::DEFAULT_BREACH_ENDPOINT;
use std::sync::Arc;
use std::time::Duration;

/// Fixed timeout for a single page request, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 15;

/// Source of search result pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of results for `query`, or `None` if the page
    /// yielded no usable data.
    async fn fetch(&self, query: &str, page: u32) -> Option<SearchResponse>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, query: &str, page: u32) -> Option<SearchResponse> {
        (**self).fetch(query, page).await
    }
}

/// HTTP client for the Dehashed search endpoint.
pub struct DehashedClient {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl DehashedClient {
    /// Create a client for the default endpoint.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(credentials: Credentials, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: DEFAULT_BREACH_ENDPOINT.to_string(),
            credentials,
        })
    }

    /// Point the client at a different search endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Build the GET request for one page.
    ///
    /// # Errors
    /// Returns error if the credentials are incomplete or the endpoint is
    /// not a valid URL.
    pub fn build_request(&self, query: &str, page: u32) -> Result<Request> {
        let authorization = self.credentials.authorization()?;

        let request = self
            .client
            .get(&self.endpoint)
            .query(&[("query", quoted(query)), ("page", page.to_string())])
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization)
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl PageFetcher for DehashedClient {
    async fn fetch(&self, query: &str, page: u32) -> Option<SearchResponse> {
        let request = match self.build_request(query, page) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("Could not build Dehashed request: {}", e);
                return None;
            }
        };

        tracing::debug!("GET {} (page {})", request.url(), page);

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Dehashed request for page {} failed: {}", page, e);
                return None;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read Dehashed response body: {}", e);
                return None;
            }
        };

        interpret_response(status, &body, query)
    }
}

/// Turn a raw HTTP status and body into a page of results.
#[must_use]
pub fn interpret_response(status: StatusCode, body: &str, query: &str) -> Option<SearchResponse> {
    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("Dehashed rejected the configured credentials (HTTP 401)");
        return None;
    }

    if !status.is_success() {
        tracing::warn!("Dehashed returned HTTP {} for {}", status.as_u16(), query);
        return None;
    }

    if body.trim().is_empty() {
        tracing::debug!("No Dehashed info found for {}", query);
        return None;
    }

    match serde_json::from_str::<SearchResponse>(body) {
        Ok(response) => {
            tracing::debug!(
                "Received {} Dehashed entries for {}",
                response.entry_count(),
                query
            );
            Some(response)
        }
        Err(e) => {
            tracing::error!("Error processing JSON response from Dehashed: {}", e);
            None
        }
    }
}

fn quoted(query: &str) -> String {
    format!("\"{query}\"")
}
