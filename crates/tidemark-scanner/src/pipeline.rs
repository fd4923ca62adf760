//! Scan orchestration: queries, retrieval, extraction, storage.

use std::time::Duration;

use tidemark_core::{AppConfig, Credentials, ScanCategory, ScanConfig};
use tidemark_insight::{ChatClient, Extraction, InsightExtractor};
use tidemark_search::{retrieve, SearchClient};

use crate::error::ScanError;
use crate::queries::build_category_queries;
use crate::report::{ExtractionPath, ScanReport, ScanWarning};
use crate::session::ScanSession;

/// Configured search and model clients.
///
/// Construction is the only fallible step: once a scanner exists, a scan
/// always produces a report.
pub struct MarketScanner {
    search: SearchClient,
    extractor: InsightExtractor,
    inter_query_delay: Duration,
}

impl MarketScanner {
    /// Builds both clients after checking that every credential is present.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotConfigured`] when any secret is missing. No network
    ///   call has been made at that point.
    /// - [`ScanError::Search`] / [`ScanError::Insight`] if a client cannot be
    ///   built (bad base URL, TLS backend failure).
    pub fn new(config: &AppConfig, credentials: &Credentials) -> Result<Self, ScanError> {
        let resolved = credentials.require()?;

        let search = SearchClient::with_base_url(
            &resolved.google_api_key,
            &resolved.google_cx_id,
            config.request_timeout_secs,
            &config.user_agent,
            &config.search_base_url,
        )?;
        let chat = ChatClient::with_base_url(
            &resolved.openai_api_key,
            &config.llm_model,
            config.request_timeout_secs,
            &config.user_agent,
            &config.llm_base_url,
        )?;

        Ok(Self {
            search,
            extractor: InsightExtractor::new(chat),
            inter_query_delay: Duration::from_millis(config.inter_query_delay_ms),
        })
    }

    /// Runs one scan and stores its alerts under `category`.
    ///
    /// A pending context trigger on the session is consumed. When retrieval
    /// yields no hits the store is left untouched and the report carries
    /// [`ScanWarning::NoResults`].
    pub async fn scan(
        &self,
        session: &ScanSession,
        category: ScanCategory,
        config: &ScanConfig,
        refinement: Option<&str>,
    ) -> ScanReport {
        let mut trigger = session.take_trigger();
        let queries = build_category_queries(category, config, refinement, &mut trigger);
        tracing::info!(category = %category, queries = queries.len(), "market scan started");

        let retrieval = retrieve(&self.search, &queries, config, self.inter_query_delay).await;

        let mut warnings: Vec<ScanWarning> = retrieval
            .failures
            .into_iter()
            .map(|f| ScanWarning::QueryFailed {
                query: f.query,
                error: f.error,
            })
            .collect();

        let hits = retrieval.hits;
        let extraction = self.extractor.extract(&hits, config, category).await;

        let path = match &extraction {
            Extraction::Empty => ExtractionPath::Skipped,
            Extraction::Analyzed(_) => ExtractionPath::Model,
            Extraction::Fallback { reason, .. } => {
                warnings.push(ScanWarning::ExtractionFallback {
                    reason: reason.clone(),
                });
                ExtractionPath::Fallback
            }
        };

        let alerts = extraction.into_records();
        if alerts.is_empty() {
            tracing::warn!(category = %category, "market scan found no relevant results");
            warnings.push(ScanWarning::NoResults);
        } else {
            session.alerts().store(category, alerts.clone());
        }

        tracing::info!(
            category = %category,
            hits = hits.len(),
            alerts = alerts.len(),
            warnings = warnings.len(),
            "market scan complete"
        );

        ScanReport {
            category,
            queries,
            hits: hits.len(),
            filtered_out: retrieval.filtered_out,
            extraction: path,
            warnings,
            alerts,
        }
    }
}

/// Checks configuration, then runs one scan.
///
/// # Errors
///
/// Returns [`ScanError`] only for configuration problems; retrieval and
/// extraction failures are reported as warnings in the [`ScanReport`].
pub async fn run_market_scan(
    app: &AppConfig,
    credentials: &Credentials,
    session: &ScanSession,
    category: ScanCategory,
    config: &ScanConfig,
    refinement: Option<&str>,
) -> Result<ScanReport, ScanError> {
    let scanner = MarketScanner::new(app, credentials)?;
    Ok(scanner.scan(session, category, config, refinement).await)
}
