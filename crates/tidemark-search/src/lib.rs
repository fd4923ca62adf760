//! Search retrieval for the Tidemark market scanner.
//!
//! Issues Custom Search API calls one query at a time, normalizes the raw
//! items into [`SearchHit`]s, and applies the geographic relevance filter.

pub mod client;
pub mod error;
pub mod normalize;
pub mod relevance;
pub mod retrieval;
pub mod types;

pub use reqwest::Url;

pub use client::{SearchClient, SearchRequest, MAX_RESULTS_PER_CALL};
pub use error::SearchError;
pub use normalize::UNKNOWN_DATE;
pub use relevance::is_relevant;
pub use retrieval::{retrieve, QueryFailure, Retrieval};
pub use types::{SearchHit, SearchItem};
