//! Query construction from scan configuration.
//!
//! Pure functions: no network, no shared state. A pending context trigger is
//! passed as `&mut Option` and taken when used, so it fires exactly once.

use chrono::{Datelike, Utc};
use tidemark_core::scan::DEFAULT_GEOGRAPHY;
use tidemark_core::{ContextTrigger, IntelligenceType, MarketSector, ScanCategory, ScanConfig};

/// Upper bound on queries per scan.
pub const MAX_QUERIES: usize = 3;
/// Queries longer than this are cut at a word boundary.
pub const MAX_QUERY_LEN: usize = 256;

/// Components joined into the primary query.
const PRIMARY_COMPONENTS: usize = 6;
/// Suppliers considered by supplier-intelligence templates.
const MAX_SUPPLIERS: usize = 2;
const DOMAIN_TERMS: [&str; 3] = ["built assets", "construction", "infrastructure"];

/// Builds up to [`MAX_QUERIES`] queries from the standing configuration.
///
/// A pending `trigger` short-circuits into a single query and is taken.
/// An entirely empty configuration yields one default query.
#[must_use]
pub fn build_queries(
    config: &ScanConfig,
    refinement: Option<&str>,
    trigger: &mut Option<ContextTrigger>,
) -> Vec<String> {
    compose_queries(config, refinement, trigger, Utc::now().year())
}

/// Builds queries for one scan category.
///
/// `General` delegates to [`build_queries`]; market sectors and supplier
/// intelligence types use their own templates. A pending `trigger` always wins.
#[must_use]
pub fn build_category_queries(
    scan: ScanCategory,
    config: &ScanConfig,
    refinement: Option<&str>,
    trigger: &mut Option<ContextTrigger>,
) -> Vec<String> {
    let year = Utc::now().year();
    match scan {
        ScanCategory::General => compose_queries(config, refinement, trigger, year),
        _ if trigger.is_some() => compose_queries(config, refinement, trigger, year),
        ScanCategory::Market(sector) => finish(market_templates(sector, config, year), refinement),
        ScanCategory::Supplier(kind) => finish(supplier_templates(kind, config), refinement),
    }
}

pub(crate) fn compose_queries(
    config: &ScanConfig,
    refinement: Option<&str>,
    trigger: &mut Option<ContextTrigger>,
    year: i32,
) -> Vec<String> {
    if let Some(trigger) = trigger.take() {
        tracing::debug!(name = %trigger.name, "building query from context trigger");
        let query = format!(
            "{} {} market trends suppliers {}",
            trigger.name.trim(),
            trigger.category.trim(),
            config.geo_label()
        );
        return finish(vec![query], None);
    }

    let mut components: Vec<String> = Vec::new();
    push_non_blank(&mut components, config.geo_focus.as_deref());
    for sub_sector in &config.sub_sectors {
        push_non_blank(&mut components, Some(sub_sector));
    }
    for sector in &config.market_categories {
        components.push(sector.label().to_string());
    }
    push_non_blank(&mut components, config.keywords.as_deref());
    push_non_blank(&mut components, refinement);

    if components.is_empty() {
        return vec![format!(
            "{DEFAULT_GEOGRAPHY} built assets construction market trends {year}"
        )];
    }

    components.extend(DOMAIN_TERMS.iter().map(|t| (*t).to_string()));

    let primary = components
        .iter()
        .take(PRIMARY_COMPONENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let analysis = format!("{} {} market analysis {year}", components[0], components[1]);
    let procurement = format!("{} procurement suppliers trends", components[0]);

    finish(vec![primary, analysis, procurement], None)
}

fn market_templates(sector: MarketSector, config: &ScanConfig, year: i32) -> Vec<String> {
    let industry = config.industry();
    let geo = config.geo_label();
    match sector {
        MarketSector::Infrastructure => vec![
            format!("{industry} infrastructure projects {geo} {year}"),
            format!("major infrastructure investment {geo} {industry}"),
            format!("infrastructure capacity constraints {geo}"),
        ],
        MarketSector::Technology => vec![
            format!("{industry} technology innovation {geo} {year}"),
            format!("digital transformation {industry} {geo}"),
            format!("emerging technology {industry} {geo}"),
        ],
        MarketSector::Services => vec![
            format!("{industry} consulting services {geo} market"),
            format!("service delivery models {industry} {geo}"),
        ],
        MarketSector::Materials => vec![
            format!("{industry} materials supply chain {geo}"),
            format!("material pricing trends {geo} {industry}"),
        ],
        MarketSector::Equipment => vec![
            format!("{industry} equipment technology {geo}"),
            format!("equipment suppliers {geo} {industry}"),
        ],
    }
}

fn supplier_templates(kind: IntelligenceType, config: &ScanConfig) -> Vec<String> {
    let geo = config.geo_label();
    let suppliers: Vec<&str> = config
        .suppliers
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(MAX_SUPPLIERS)
        .collect();

    if suppliers.is_empty() {
        return vec![format!(
            "{} {} suppliers {geo}",
            kind.label(),
            config.industry()
        )];
    }

    let focus = match kind {
        IntelligenceType::MarketTrends => "market share trends",
        IntelligenceType::FinancialIntelligence => "investment funding acquisition",
        IntelligenceType::RegulatoryCompliance => "regulation compliance standards",
        IntelligenceType::GovernmentPrograms => "government framework tender",
        IntelligenceType::InnovationTracking => "innovation R&D technology",
        IntelligenceType::CompetitiveIntelligence => "contract award wins",
    };
    suppliers
        .into_iter()
        .map(|supplier| format!("\"{supplier}\" {focus} {geo}"))
        .collect()
}

fn push_non_blank(components: &mut Vec<String>, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        components.push(value.to_string());
    }
}

/// Appends the refinement, caps length and count, and drops duplicates.
fn finish(queries: Vec<String>, refinement: Option<&str>) -> Vec<String> {
    let refinement = refinement.map(str::trim).filter(|r| !r.is_empty());
    let mut out: Vec<String> = Vec::with_capacity(MAX_QUERIES);
    for query in queries {
        let query = match refinement {
            Some(r) => format!("{query} {r}"),
            None => query,
        };
        let query = cap_length(&query);
        if !query.is_empty() && !out.contains(&query) {
            out.push(query);
        }
        if out.len() == MAX_QUERIES {
            break;
        }
    }
    out
}

fn cap_length(query: &str) -> String {
    let collapsed = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= MAX_QUERY_LEN {
        return collapsed;
    }
    let mut cut = String::new();
    for word in collapsed.split(' ') {
        let needed = if cut.is_empty() { word.len() } else { word.len() + 1 };
        if cut.len() + needed > MAX_QUERY_LEN {
            break;
        }
        if !cut.is_empty() {
            cut.push(' ');
        }
        cut.push_str(word);
    }
    if cut.is_empty() {
        // A single word longer than the cap: cut on a char boundary.
        collapsed
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= MAX_QUERY_LEN)
            .map(|(_, c)| c)
            .collect()
    } else {
        cut
    }
}

#[cfg(test)]
#[path = "queries_test.rs"]
mod tests;
