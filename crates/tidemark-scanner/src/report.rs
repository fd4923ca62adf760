use serde::Serialize;
use tidemark_core::{AlertRecord, ScanCategory};

/// Non-fatal conditions met during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanWarning {
    QueryFailed { query: String, error: String },
    NoResults,
    ExtractionFallback { reason: String },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::QueryFailed { query, error } => {
                write!(f, "query '{query}' failed: {error}")
            }
            ScanWarning::NoResults => write!(f, "no relevant search results"),
            ScanWarning::ExtractionFallback { reason } => {
                write!(f, "insight extraction fell back to raw snippets: {reason}")
            }
        }
    }
}

/// Which extraction path produced the alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPath {
    /// No hits, so the model was never called.
    Skipped,
    Model,
    Fallback,
}

/// Outcome of one scan invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub category: ScanCategory,
    pub queries: Vec<String>,
    pub hits: usize,
    pub filtered_out: usize,
    pub extraction: ExtractionPath,
    pub warnings: Vec<ScanWarning>,
    pub alerts: Vec<AlertRecord>,
}

impl ScanReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
