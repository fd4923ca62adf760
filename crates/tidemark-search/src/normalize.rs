//! Normalization of raw search items into [`SearchHit`]s.

use reqwest::Url;
use serde_json::Value;

use crate::types::{SearchHit, SearchItem};

/// Sentinel published-date used when no metadata field carries a date.
pub const UNKNOWN_DATE: &str = "Recent";

const METATAG_DATE_FIELDS: &[&str] = &["article:published_time", "date", "pubdate", "last-modified"];
const STRUCTURED_DATE_BLOCKS: &[&str] = &["newsarticle", "article", "webpage"];
const STRUCTURED_DATE_FIELDS: &[&str] = &["datepublished", "datemodified"];

/// Converts a raw item into a [`SearchHit`].
///
/// Returns `None` when the link is not an absolute `http(s)` URL with a host.
#[must_use]
pub fn normalize_item(item: SearchItem, query: &str) -> Option<SearchHit> {
    let url = Url::parse(item.link.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?.to_string();

    let published = extract_date(&item);
    let source = if item.display_link.trim().is_empty() {
        host
    } else {
        item.display_link.trim().to_string()
    };

    Some(SearchHit {
        title: item.title.trim().to_string(),
        url,
        snippet: item.snippet.trim().to_string(),
        source,
        published,
        query: query.to_string(),
    })
}

/// Best-effort publication date from the item's page metadata.
///
/// Looks at the first `metatags` block, then the first block of each
/// structured-data type. Falls back to [`UNKNOWN_DATE`].
#[must_use]
pub fn extract_date(item: &SearchItem) -> String {
    let Some(pagemap) = &item.pagemap else {
        return UNKNOWN_DATE.to_string();
    };

    if let Some(date) = first_block(pagemap, "metatags").and_then(|b| first_field(b, METATAG_DATE_FIELDS)) {
        return date;
    }

    STRUCTURED_DATE_BLOCKS
        .iter()
        .find_map(|block| first_block(pagemap, block).and_then(|b| first_field(b, STRUCTURED_DATE_FIELDS)))
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// First block of the named kind. Blocks are lists of objects; any other
/// shape yields `None`.
fn first_block<'a>(pagemap: &'a Value, name: &str) -> Option<&'a Value> {
    pagemap
        .get(name)?
        .as_array()?
        .first()
        .filter(|block| block.is_object())
}

fn first_field(block: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        block
            .get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_pagemap(pagemap: serde_json::Value) -> SearchItem {
        serde_json::from_value(serde_json::json!({
            "title": "Ofwat sets AMP8 allowances",
            "link": "https://www.ofwat.gov.uk/news/amp8",
            "snippet": "The regulator published final determinations.",
            "displayLink": "www.ofwat.gov.uk",
            "pagemap": pagemap
        }))
        .unwrap()
    }

    #[test]
    fn extract_date_prefers_metatags() {
        let item = item_with_pagemap(serde_json::json!({
            "metatags": [{ "article:published_time": "2024-12-19T09:00:00Z" }],
            "newsarticle": [{ "datepublished": "2024-01-01" }]
        }));
        assert_eq!(extract_date(&item), "2024-12-19T09:00:00Z");
    }

    #[test]
    fn extract_date_falls_through_metatag_fields_in_order() {
        let item = item_with_pagemap(serde_json::json!({
            "metatags": [{ "pubdate": "2024-03-01", "last-modified": "2024-04-01" }]
        }));
        assert_eq!(extract_date(&item), "2024-03-01");
    }

    #[test]
    fn extract_date_uses_structured_blocks_when_metatags_lack_dates() {
        let item = item_with_pagemap(serde_json::json!({
            "metatags": [{ "og:title": "Ofwat" }],
            "webpage": [{ "datemodified": "2024-07-07" }]
        }));
        assert_eq!(extract_date(&item), "2024-07-07");
    }

    #[test]
    fn extract_date_defaults_to_recent() {
        let item = item_with_pagemap(serde_json::json!({ "metatags": [{}] }));
        assert_eq!(extract_date(&item), UNKNOWN_DATE);

        let bare = SearchItem::default();
        assert_eq!(extract_date(&bare), UNKNOWN_DATE);
    }

    #[test]
    fn extract_date_ignores_non_string_values() {
        let item = item_with_pagemap(serde_json::json!({
            "metatags": [{ "date": 20240101 }]
        }));
        assert_eq!(extract_date(&item), UNKNOWN_DATE);
    }

    #[test]
    fn odd_pagemap_shapes_never_fail_the_page() {
        let page: crate::types::SearchResponse = serde_json::from_value(serde_json::json!({
            "items": [
                { "title": "Plain", "link": "https://www.gov.uk/a" },
                {
                    "title": "Object block",
                    "link": "https://www.gov.uk/b",
                    "pagemap": { "metatags": { "date": "2024-01-01" } }
                },
                {
                    "title": "Scalar block",
                    "link": "https://www.gov.uk/c",
                    "pagemap": { "metatags": "2024-01-01", "newsarticle": [42] }
                },
                { "title": "Scalar pagemap", "link": "https://www.gov.uk/d", "pagemap": [] }
            ]
        }))
        .expect("page with odd pagemaps should still parse");

        let hits: Vec<_> = page
            .items
            .into_iter()
            .filter_map(|item| normalize_item(item, "q"))
            .collect();
        assert_eq!(hits.len(), 4);
        assert_eq!(hits[0].published, UNKNOWN_DATE);
        assert_eq!(hits[1].title, "Object block");
        assert_eq!(hits[1].published, UNKNOWN_DATE);
        assert_eq!(hits[2].published, UNKNOWN_DATE);
        assert_eq!(hits[3].published, UNKNOWN_DATE);
    }

    #[test]
    fn normalize_item_keeps_query_and_display_link() {
        let item = item_with_pagemap(serde_json::json!({}));
        let hit = normalize_item(item, "AMP8 water").unwrap();
        assert_eq!(hit.source, "www.ofwat.gov.uk");
        assert_eq!(hit.query, "AMP8 water");
        assert_eq!(hit.url.host_str(), Some("www.ofwat.gov.uk"));
        assert_eq!(hit.published, UNKNOWN_DATE);
    }

    #[test]
    fn normalize_item_falls_back_to_host_for_source() {
        let item = SearchItem {
            link: "https://www.water.org.uk/news".to_string(),
            ..SearchItem::default()
        };
        let hit = normalize_item(item, "q").unwrap();
        assert_eq!(hit.source, "www.water.org.uk");
    }

    #[test]
    fn normalize_item_rejects_relative_and_non_http_links() {
        for link in ["/news/amp8", "", "mailto:press@ofwat.gov.uk", "ftp://files.example.com/a"] {
            let item = SearchItem {
                link: link.to_string(),
                ..SearchItem::default()
            };
            assert!(normalize_item(item, "q").is_none(), "{link} should be rejected");
        }
    }
}
