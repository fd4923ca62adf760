use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("market scanner not configured: {0}")]
    NotConfigured(#[from] tidemark_core::ConfigError),

    #[error("search client error: {0}")]
    Search(#[from] tidemark_search::SearchError),

    #[error("insight client error: {0}")]
    Insight(#[from] tidemark_insight::InsightError),
}
