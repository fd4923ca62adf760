//! Extraction prompt assembly.

use std::fmt::Write as _;

use tidemark_core::{ScanCategory, ScanConfig};
use tidemark_search::SearchHit;

/// Builds the single prompt sent for a batch of hits.
///
/// Hits are numbered from 1 in batch order so the model can refer back to
/// them; the requested category enumeration follows the scan context.
#[must_use]
pub fn build_prompt(hits: &[SearchHit], config: &ScanConfig, scan: ScanCategory) -> String {
    let mut content = String::new();
    for (index, hit) in hits.iter().enumerate() {
        let _ = write!(
            content,
            "\nResult {}:\nTitle: {}\nSource: {}\nDate: {}\nContent: {}\n",
            index + 1,
            hit.title,
            hit.source,
            hit.published,
            hit.snippet
        );
    }

    let focus_categories = focus_categories(config);
    let suppliers = if config.suppliers.is_empty() {
        "Any suppliers mentioned".to_string()
    } else {
        config.suppliers.join(", ")
    };
    let allowed = scan
        .context()
        .categories()
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(" | ");
    let default_category = scan.default_alert_category();

    format!(
        "Analyze these search results and extract procurement and market intelligence \
for a {industry} organisation operating in {geo}.\n\
\n\
Scan: {scan_label}\n\
Analysis categories: {focus_categories}\n\
Supplier focus: {suppliers}\n\
{content}\n\
Return a JSON object with a single key \"insights\" holding an array. \
Produce one insight per result where the result carries usable intelligence, \
in the same order as the results. Each insight must have:\n\
- \"title\": a short headline\n\
- \"category\": exactly one of {allowed} (use \"{default_category}\" when unsure)\n\
- \"impact_level\": High | Medium | Low\n\
- \"summary\": two or three sentences\n\
- \"insights\": array of short strings\n\
- \"recommended_actions\": array of short strings\n\
- \"suppliers_mentioned\": array of company names found in the text\n\
- \"relevance_score\": number between 0.0 and 1.0\n\
\n\
Base every field only on the content above.",
        industry = config.industry(),
        geo = config.geo_label(),
        scan_label = scan.label(),
    )
}

fn focus_categories(config: &ScanConfig) -> String {
    if !config.market_categories.is_empty() {
        config
            .market_categories
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ")
    } else if !config.intelligence_types.is_empty() {
        config
            .intelligence_types
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(", ")
    } else {
        "All categories".to_string()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use tidemark_core::{IntelligenceType, MarketSector};

    use super::*;

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: Url::parse("https://www.gov.uk/a").unwrap(),
            snippet: "Capital programme update".to_string(),
            source: "www.gov.uk".to_string(),
            published: "2024-05-01".to_string(),
            query: "q".to_string(),
        }
    }

    #[test]
    fn numbers_each_result_in_order() {
        let prompt = build_prompt(
            &[hit("First"), hit("Second")],
            &ScanConfig::default(),
            ScanCategory::General,
        );
        let first = prompt.find("Result 1:\nTitle: First").unwrap();
        let second = prompt.find("Result 2:\nTitle: Second").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Date: 2024-05-01"));
    }

    #[test]
    fn supplier_scan_offers_only_supplier_categories() {
        let prompt = build_prompt(
            &[hit("A")],
            &ScanConfig::default(),
            ScanCategory::Supplier(IntelligenceType::FinancialIntelligence),
        );
        assert!(prompt.contains("Financial Intelligence | Regulatory & Compliance"));
        assert!(!prompt.contains("Infrastructure |"));
    }

    #[test]
    fn focus_lists_market_categories_before_intelligence_types() {
        let config = ScanConfig {
            market_categories: vec![MarketSector::Technology],
            intelligence_types: vec![IntelligenceType::InnovationTracking],
            ..ScanConfig::default()
        };
        let prompt = build_prompt(&[hit("A")], &config, ScanCategory::General);
        assert!(prompt.contains("Analysis categories: Technology\n"));
    }

    #[test]
    fn empty_supplier_list_asks_for_any_supplier() {
        let prompt = build_prompt(&[hit("A")], &ScanConfig::default(), ScanCategory::General);
        assert!(prompt.contains("Supplier focus: Any suppliers mentioned"));
        assert!(prompt.contains("Analysis categories: All categories"));
    }
}
