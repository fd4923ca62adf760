//! Insight extraction: one model call per batch, with a deterministic fallback.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tidemark_core::{
    AlertCategory, AlertOrigin, AlertRecord, ImpactLevel, ScanCategory, ScanConfig,
};
use tidemark_search::SearchHit;
use uuid::Uuid;

use crate::client::ChatClient;
use crate::error::InsightError;
use crate::prompt::build_prompt;

/// Relevance assigned when the model omits a score or sends a non-finite one.
pub const DEFAULT_RELEVANCE: f64 = 0.7;
/// Relevance assigned to every fallback record.
pub const FALLBACK_RELEVANCE: f64 = 0.6;
/// Fallback summaries keep at most this many characters of the snippet.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

const FALLBACK_INSIGHT: &str = "Market information available";
const FALLBACK_ACTION: &str = "Review detailed source information";

/// Result of extracting insights from one batch of hits.
#[derive(Debug)]
pub enum Extraction {
    /// No hits were supplied, so no model call was made.
    Empty,
    /// The model returned at least one usable insight.
    Analyzed(Vec<AlertRecord>),
    /// The model call or its parsing failed; one record per hit was synthesized.
    Fallback {
        records: Vec<AlertRecord>,
        reason: String,
    },
}

impl Extraction {
    #[must_use]
    pub fn records(&self) -> &[AlertRecord] {
        match self {
            Extraction::Empty => &[],
            Extraction::Analyzed(records) | Extraction::Fallback { records, .. } => records,
        }
    }

    #[must_use]
    pub fn into_records(self) -> Vec<AlertRecord> {
        match self {
            Extraction::Empty => Vec::new(),
            Extraction::Analyzed(records) | Extraction::Fallback { records, .. } => records,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback { .. })
    }
}

/// Turns search hits into alert records for one scan category.
pub struct InsightExtractor {
    client: ChatClient,
}

impl InsightExtractor {
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    /// Sends every hit in one prompt and maps the reply onto alert records.
    ///
    /// Never fails: any transport, API or parse problem degrades to
    /// [`Extraction::Fallback`] with exactly one record per hit.
    pub async fn extract(
        &self,
        hits: &[SearchHit],
        config: &ScanConfig,
        scan: ScanCategory,
    ) -> Extraction {
        if hits.is_empty() {
            return Extraction::Empty;
        }

        let prompt = build_prompt(hits, config, scan);
        let outcome = self
            .client
            .complete_json(&prompt)
            .await
            .and_then(|content| parse_insights(&content, hits, scan));

        match outcome {
            Ok(records) => {
                tracing::info!(
                    scan = %scan,
                    hits = hits.len(),
                    insights = records.len(),
                    "insight extraction complete"
                );
                Extraction::Analyzed(records)
            }
            Err(e) => {
                tracing::warn!(
                    scan = %scan,
                    hits = hits.len(),
                    error = %e,
                    "insight extraction failed; using fallback records"
                );
                Extraction::Fallback {
                    records: fallback_records(hits, scan),
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// One model-produced insight before normalisation. Every field is optional so
/// a partly-formed entry still yields a record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInsight {
    title: Option<String>,
    category: Option<String>,
    impact_level: Option<String>,
    summary: Option<String>,
    #[serde(alias = "key_insights", deserialize_with = "string_list")]
    insights: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    recommended_actions: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    suppliers_mentioned: Vec<String>,
    relevance_score: Option<Value>,
}

/// Accepts an array of strings, a single string, or null. Non-string array
/// members and blank strings are dropped.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Parses the model's JSON reply into alert records.
///
/// Insight `i` takes its provenance (source, URL, timestamp) from hit
/// `i % hits.len()`. Entries that are not JSON objects are skipped but still
/// consume their position.
///
/// # Errors
///
/// - [`InsightError::Deserialize`] if `content` is not JSON.
/// - [`InsightError::NoInsights`] if there is no `insights` array, or no entry
///   in it is an object.
pub fn parse_insights(
    content: &str,
    hits: &[SearchHit],
    scan: ScanCategory,
) -> Result<Vec<AlertRecord>, InsightError> {
    if hits.is_empty() {
        return Err(InsightError::NoInsights);
    }

    let value: Value = serde_json::from_str(content).map_err(|e| InsightError::Deserialize {
        context: "insight payload".to_string(),
        source: e,
    })?;

    let Some(Value::Array(entries)) = value.get("insights").cloned() else {
        return Err(InsightError::NoInsights);
    };

    let generated_at = Utc::now();
    let records: Vec<AlertRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if !entry.is_object() {
                tracing::debug!(index, "skipping non-object insight entry");
                return None;
            }
            let raw = match serde_json::from_value::<RawInsight>(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!(index, error = %e, "skipping malformed insight entry");
                    return None;
                }
            };
            let hit = &hits[index % hits.len()];
            Some(build_record(raw, index, hit, scan, generated_at))
        })
        .collect();

    if records.is_empty() {
        return Err(InsightError::NoInsights);
    }
    Ok(records)
}

fn build_record(
    raw: RawInsight,
    index: usize,
    hit: &SearchHit,
    scan: ScanCategory,
    generated_at: chrono::DateTime<Utc>,
) -> AlertRecord {
    let title = non_blank(raw.title).unwrap_or_else(|| format!("Market Intelligence #{}", index + 1));
    let impact_level = raw
        .impact_level
        .as_deref()
        .and_then(ImpactLevel::parse_lenient)
        .unwrap_or_default();

    AlertRecord {
        id: Uuid::new_v4(),
        title,
        category: normalize_category(raw.category.as_deref(), scan),
        impact_level,
        relevance_score: normalize_relevance(raw.relevance_score.as_ref()),
        summary: non_blank(raw.summary).unwrap_or_default(),
        insights: raw.insights,
        recommended_actions: raw.recommended_actions,
        suppliers_mentioned: raw.suppliers_mentioned.into_iter().collect(),
        source: hit.source.clone(),
        url: hit.url.to_string(),
        timestamp: hit.published.clone(),
        origin: AlertOrigin::Model,
        generated_at,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Maps a free-form category onto the scan context's enumeration, falling
/// back to the scan's default when it is unknown or belongs to another context.
#[must_use]
pub fn normalize_category(raw: Option<&str>, scan: ScanCategory) -> AlertCategory {
    let context = scan.context();
    raw.and_then(AlertCategory::parse_lenient)
        .filter(|category| context.allows(*category))
        .unwrap_or_else(|| scan.default_alert_category())
}

/// Accepts a number or a numeric string; clamps into `[0, 1]`.
#[must_use]
pub fn normalize_relevance(raw: Option<&Value>) -> f64 {
    let score = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match score {
        Some(score) if score.is_finite() => score.clamp(0.0, 1.0),
        _ => DEFAULT_RELEVANCE,
    }
}

/// Synthesizes one record per hit without any model involvement.
#[must_use]
pub fn fallback_records(hits: &[SearchHit], scan: ScanCategory) -> Vec<AlertRecord> {
    let generated_at = Utc::now();
    let category = scan.default_alert_category();
    hits.iter()
        .map(|hit| AlertRecord {
            id: Uuid::new_v4(),
            title: if hit.title.trim().is_empty() {
                hit.source.clone()
            } else {
                hit.title.clone()
            },
            category,
            impact_level: ImpactLevel::Medium,
            relevance_score: FALLBACK_RELEVANCE,
            summary: truncate_summary(&hit.snippet),
            insights: vec![FALLBACK_INSIGHT.to_string()],
            recommended_actions: vec![FALLBACK_ACTION.to_string()],
            suppliers_mentioned: BTreeSet::new(),
            source: hit.source.clone(),
            url: hit.url.to_string(),
            timestamp: hit.published.clone(),
            origin: AlertOrigin::Fallback,
            generated_at,
        })
        .collect()
}

/// Cuts on a character boundary and marks the cut with an ellipsis.
fn truncate_summary(snippet: &str) -> String {
    let snippet = snippet.trim();
    if snippet.chars().count() <= FALLBACK_SUMMARY_CHARS {
        return snippet.to_string();
    }
    let cut: String = snippet.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use serde_json::json;
    use tidemark_core::{IntelligenceType, MarketSector};

    use super::*;

    fn hit(n: usize) -> SearchHit {
        SearchHit {
            title: format!("Result {n}"),
            url: Url::parse(&format!("https://example.co.uk/{n}")).unwrap(),
            snippet: format!("Snippet {n}"),
            source: format!("source{n}.co.uk"),
            published: format!("2024-0{n}-01"),
            query: "q".to_string(),
        }
    }

    #[test]
    fn provenance_wraps_modulo_hit_count() {
        let hits = vec![hit(1), hit(2)];
        let content = json!({
            "insights": [{ "title": "a" }, { "title": "b" }, { "title": "c" }]
        })
        .to_string();

        let records = parse_insights(&content, &hits, ScanCategory::General).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].source, "source1.co.uk");
        assert_eq!(records[1].source, "source2.co.uk");
        assert_eq!(records[2].source, "source1.co.uk");
        assert_eq!(records[2].timestamp, "2024-01-01");
    }

    #[test]
    fn skipped_entries_still_consume_their_position() {
        let hits = vec![hit(1), hit(2)];
        let content = json!({ "insights": ["oops", { "title": "b" }] }).to_string();

        let records = parse_insights(&content, &hits, ScanCategory::General).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "source2.co.uk");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let content = json!({ "insights": [{}] }).to_string();
        let records = parse_insights(&content, &[hit(1)], ScanCategory::General).unwrap();

        let record = &records[0];
        assert_eq!(record.title, "Market Intelligence #1");
        assert_eq!(record.category, AlertCategory::MarketTrends);
        assert_eq!(record.impact_level, ImpactLevel::Medium);
        assert!((record.relevance_score - DEFAULT_RELEVANCE).abs() < f64::EPSILON);
        assert_eq!(record.origin, AlertOrigin::Model);
    }

    #[test]
    fn supplier_scan_rejects_market_only_category() {
        let scan = ScanCategory::Supplier(IntelligenceType::FinancialIntelligence);
        assert_eq!(
            normalize_category(Some("Infrastructure"), scan),
            AlertCategory::FinancialIntelligence
        );
        assert_eq!(
            normalize_category(Some("regulatory"), scan),
            AlertCategory::RegulatoryCompliance
        );
    }

    #[test]
    fn market_scan_defaults_to_its_sector() {
        let scan = ScanCategory::Market(MarketSector::Equipment);
        assert_eq!(normalize_category(Some("nonsense"), scan), AlertCategory::Equipment);
        assert_eq!(normalize_category(None, scan), AlertCategory::Equipment);
    }

    #[test]
    fn relevance_is_clamped_and_coerced() {
        assert!((normalize_relevance(Some(&json!(1.7))) - 1.0).abs() < f64::EPSILON);
        assert!(normalize_relevance(Some(&json!(-0.2))).abs() < f64::EPSILON);
        assert!((normalize_relevance(Some(&json!("0.85"))) - 0.85).abs() < f64::EPSILON);
        assert!((normalize_relevance(Some(&json!("high"))) - DEFAULT_RELEVANCE).abs() < f64::EPSILON);
        assert!((normalize_relevance(None) - DEFAULT_RELEVANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn suppliers_are_deduplicated() {
        let content = json!({
            "insights": [{ "suppliers_mentioned": ["Acme Pipes", "Acme Pipes", " ", "Balfour"] }]
        })
        .to_string();
        let records = parse_insights(&content, &[hit(1)], ScanCategory::General).unwrap();
        let suppliers: Vec<&str> = records[0]
            .suppliers_mentioned
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(suppliers, vec!["Acme Pipes", "Balfour"]);
    }

    #[test]
    fn lone_string_list_fields_are_accepted() {
        let content = json!({
            "insights": [{ "insights": "single point", "recommended_actions": null }]
        })
        .to_string();
        let records = parse_insights(&content, &[hit(1)], ScanCategory::General).unwrap();
        assert_eq!(records[0].insights, vec!["single point".to_string()]);
        assert!(records[0].recommended_actions.is_empty());
    }

    #[test]
    fn empty_or_missing_insights_is_an_error() {
        let hits = [hit(1)];
        for content in [r#"{"insights": []}"#, r#"{"results": []}"#, r#"{"insights": [1, 2]}"#] {
            assert!(
                matches!(
                    parse_insights(content, &hits, ScanCategory::General),
                    Err(InsightError::NoInsights)
                ),
                "{content}"
            );
        }
    }

    #[test]
    fn non_json_reply_is_a_deserialize_error() {
        let result = parse_insights("not json", &[hit(1)], ScanCategory::General);
        assert!(matches!(result, Err(InsightError::Deserialize { .. })));
    }

    #[test]
    fn fallback_produces_one_record_per_hit() {
        let mut long = hit(2);
        long.snippet = "x".repeat(250);
        let records = fallback_records(
            &[hit(1), long],
            ScanCategory::Supplier(IntelligenceType::MarketTrends),
        );

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.impact_level, ImpactLevel::Medium);
            assert!((record.relevance_score - FALLBACK_RELEVANCE).abs() < f64::EPSILON);
            assert_eq!(record.category, AlertCategory::CompetitiveIntelligence);
            assert_eq!(record.origin, AlertOrigin::Fallback);
        }
        assert_eq!(records[0].summary, "Snippet 1");
        assert_eq!(records[1].summary.chars().count(), FALLBACK_SUMMARY_CHARS + 3);
        assert!(records[1].summary.ends_with("..."));
        assert_eq!(records[1].url, "https://example.co.uk/2");
    }
}
