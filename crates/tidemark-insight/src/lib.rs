//! Insight extraction for the Tidemark market scanner.
//!
//! Sends a batch of search snippets to a chat-completions model in JSON mode
//! and maps the reply onto [`tidemark_core::AlertRecord`]s. When the model is
//! unreachable or its reply is unusable, a deterministic one-record-per-hit
//! fallback is produced instead.

pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;

pub use client::ChatClient;
pub use error::InsightError;
pub use extract::{
    fallback_records, parse_insights, Extraction, InsightExtractor, DEFAULT_RELEVANCE,
    FALLBACK_RELEVANCE,
};
pub use prompt::build_prompt;
