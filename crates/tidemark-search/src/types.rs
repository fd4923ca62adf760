//! Custom Search JSON API response types and the normalized [`SearchHit`].
//!
//! Only the fields the scanner reads are modelled. Everything is defaulted so
//! a sparse item never fails the whole page.

use reqwest::Url;
use serde::Deserialize;

/// Top-level search response: `{ "items": [ ... ] }`.
///
/// `items` is absent entirely when the query has no results.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One raw result item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, rename = "displayLink")]
    pub display_link: String,
    /// Structured page metadata, keyed by block name (`metatags`,
    /// `newsarticle`, ...). Usually each block is a list of flat string
    /// maps, but the shape is publisher-controlled and kept untyped.
    #[serde(default)]
    pub pagemap: Option<serde_json::Value>,
}

/// Error envelope returned with non-2xx statuses:
/// `{ "error": { "code": 403, "message": "..." } }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// One normalized search result.
///
/// The snippet is the only text content used downstream; pages are never
/// fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: Url,
    pub snippet: String,
    /// Display domain.
    pub source: String,
    /// Best-effort publication date, `"Recent"` when none could be found.
    pub published: String,
    /// The un-augmented query that produced this hit.
    pub query: String,
}
