//! Geographic relevance heuristics for search hits.
//!
//! Only UK scoping is geography-sensitive. A hit is kept when its host ends in
//! a UK domain suffix or its text mentions a UK keyword; it is dropped when it
//! carries an explicit non-UK indicator; anything else is kept.

use std::collections::BTreeSet;

use tidemark_core::Region;

use crate::types::SearchHit;

const UK_DOMAIN_SUFFIXES: &[&str] = &[".gov.uk", ".ac.uk", ".co.uk", ".org.uk", ".nhs.uk"];

const UK_KEYWORDS: &[&str] = &[
    "united kingdom",
    "uk",
    "britain",
    "england",
    "wales",
    "scotland",
    "ofwat",
    "defra",
];

const NON_UK_DOMAIN_SUFFIXES: &[&str] = &[".us", ".edu"];

const NON_UK_INDICATORS: &[&str] = &["usa", "united states", "colorado", "california", ".edu"];

/// Decides whether `hit` should be kept for the given geographic scope.
#[must_use]
pub fn is_relevant(hit: &SearchHit, scope: &BTreeSet<Region>) -> bool {
    if !scope.contains(&Region::Uk) {
        return true;
    }

    let host = hit.url.host_str().unwrap_or_default().to_lowercase();
    if has_suffix(&host, UK_DOMAIN_SUFFIXES) {
        return true;
    }

    let text = format!("{} {}", hit.title, hit.snippet).to_lowercase();
    if UK_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        return true;
    }

    let url = hit.url.as_str().to_lowercase();
    if has_suffix(&host, NON_UK_DOMAIN_SUFFIXES)
        || NON_UK_INDICATORS
            .iter()
            .any(|indicator| url.contains(indicator) || text.contains(indicator))
    {
        return false;
    }

    true
}

/// True when `host` ends with one of `suffixes` or equals one without its
/// leading dot (`gov.uk` itself).
fn has_suffix(host: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|suffix| host.ends_with(suffix) || host == &suffix[1..])
}
