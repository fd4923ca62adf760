//! HTTP client for the Custom Search JSON API.
//!
//! Wraps `reqwest` with API key and search-scope management, query-parameter
//! encoding, and typed response deserialization. Non-2xx statuses surface as
//! [`SearchError::Api`] with the provider's own message when it sends one.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SearchError;
use crate::types::{ErrorResponse, SearchItem, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Provider cap on results per call.
pub const MAX_RESULTS_PER_CALL: u8 = 10;

/// Parameters for one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
    /// Clamped to [`MAX_RESULTS_PER_CALL`].
    pub num: u8,
    pub date_restrict: &'a str,
    /// Geolocation hint (`gl`), e.g. `"uk"`.
    pub geolocation: Option<&'a str>,
    /// Interface language hint (`hl`), e.g. `"en-GB"`.
    pub language: Option<&'a str>,
}

/// Client for the Custom Search JSON API.
///
/// Use [`SearchClient::new`] for production or [`SearchClient::with_base_url`]
/// to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    api_key: String,
    search_scope: String,
    base_url: Url,
}

impl SearchClient {
    /// Creates a new client pointed at the production search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        search_scope: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, search_scope, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom endpoint URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SearchError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        search_scope: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url.trim()).map_err(|e| SearchError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_scope: search_scope.to_owned(),
            base_url,
        })
    }

    /// Issues one search call and returns the raw result items in provider order.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Api`] if the provider returns a non-2xx status.
    /// - [`SearchError::Http`] on network failure.
    /// - [`SearchError::Deserialize`] if the body does not match the expected shape.
    pub async fn search(&self, request: &SearchRequest<'_>) -> Result<Vec<SearchItem>, SearchError> {
        let url = self.build_url(request);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(q={})", request.query),
                source: e,
            })?;

        Ok(parsed.items)
    }

    /// Builds the full request URL with properly percent-encoded query parameters.
    fn build_url(&self, request: &SearchRequest<'_>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("cx", &self.search_scope);
            pairs.append_pair("q", request.query);
            pairs.append_pair("num", &request.num.min(MAX_RESULTS_PER_CALL).to_string());
            pairs.append_pair("dateRestrict", request.date_restrict);
            if let Some(gl) = request.geolocation {
                pairs.append_pair("gl", gl);
            }
            if let Some(hl) = request.language {
                pairs.append_pair("hl", hl);
            }
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
