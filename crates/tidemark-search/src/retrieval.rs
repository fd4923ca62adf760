//! Sequential, rate-limited retrieval over a batch of queries.

use std::collections::HashSet;
use std::time::Duration;

use tidemark_core::ScanConfig;

use crate::client::{SearchClient, SearchRequest, MAX_RESULTS_PER_CALL};
use crate::normalize::normalize_item;
use crate::relevance::is_relevant;
use crate::types::SearchHit;

/// Filter syntax appended to every query when the scope includes the UK.
const UK_SITE_FILTER: &str = r#"(site:gov.uk OR site:ac.uk OR site:co.uk) "United Kingdom" OR "UK""#;

/// A query that failed; retrieval carried on without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFailure {
    pub query: String,
    pub error: String,
}

/// Outcome of a retrieval batch.
#[derive(Debug, Default)]
pub struct Retrieval {
    /// Relevant, de-duplicated hits in query order then provider order.
    pub hits: Vec<SearchHit>,
    pub failures: Vec<QueryFailure>,
    /// Hits dropped by the relevance filter.
    pub filtered_out: usize,
}

/// Runs one search call per query, strictly in sequence, pausing
/// `inter_query_delay` between calls.
///
/// A failing query is recorded in [`Retrieval::failures`] and never aborts the
/// batch. Hits failing the relevance filter, carrying an unusable URL, or
/// repeating a URL already seen in this batch are dropped.
pub async fn retrieve(
    client: &SearchClient,
    queries: &[String],
    config: &ScanConfig,
    inter_query_delay: Duration,
) -> Retrieval {
    let mut retrieval = Retrieval::default();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let uk_scoped = config.is_uk_scoped();

    for (index, query) in queries.iter().enumerate() {
        if index > 0 && !inter_query_delay.is_zero() {
            tokio::time::sleep(inter_query_delay).await;
        }

        let augmented = augment_query(query, uk_scoped);
        let request = SearchRequest {
            query: &augmented,
            num: MAX_RESULTS_PER_CALL,
            date_restrict: config.time_range.date_restrict(),
            geolocation: uk_scoped.then_some("uk"),
            language: Some(if uk_scoped { "en-GB" } else { "en" }),
        };

        let items = match client.search(&request).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "search query failed; continuing");
                retrieval.failures.push(QueryFailure {
                    query: query.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let returned = items.len();
        let mut kept = 0usize;
        for item in items {
            let Some(hit) = normalize_item(item, query) else {
                tracing::debug!(query = %query, "dropping search item without a usable URL");
                continue;
            };
            if !is_relevant(&hit, &config.geographic_scope) {
                retrieval.filtered_out += 1;
                continue;
            }
            if !seen_urls.insert(hit.url.as_str().to_string()) {
                continue;
            }
            kept += 1;
            retrieval.hits.push(hit);
        }

        tracing::debug!(query = %query, returned, kept, "search query complete");
    }

    retrieval
}

/// Adds the national-domain filter syntax when the scope is UK.
#[must_use]
pub fn augment_query(query: &str, uk_scoped: bool) -> String {
    if uk_scoped {
        format!("{query} {UK_SITE_FILTER}")
    } else {
        query.to_string()
    }
}
