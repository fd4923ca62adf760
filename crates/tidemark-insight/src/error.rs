use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("language model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("language model returned an empty response")]
    EmptyResponse,

    #[error("language model response contained no usable insights")]
    NoInsights,

    #[error("invalid language model base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
