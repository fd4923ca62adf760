//! Structured intelligence alerts produced by a scan.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scan::MarketSector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertCategory {
    Infrastructure,
    Technology,
    Services,
    Materials,
    Equipment,
    #[serde(rename = "Market Trends")]
    MarketTrends,
    #[serde(rename = "Regulatory & Compliance")]
    RegulatoryCompliance,
    #[serde(rename = "Financial Intelligence")]
    FinancialIntelligence,
    #[serde(rename = "Government Programs")]
    GovernmentPrograms,
    #[serde(rename = "Innovation Tracking")]
    InnovationTracking,
    #[serde(rename = "Competitive Intelligence")]
    CompetitiveIntelligence,
}

impl AlertCategory {
    /// Categories valid for market-intelligence scans.
    pub const MARKET: &'static [AlertCategory] = &[
        AlertCategory::Infrastructure,
        AlertCategory::Technology,
        AlertCategory::Services,
        AlertCategory::Materials,
        AlertCategory::Equipment,
        AlertCategory::MarketTrends,
        AlertCategory::RegulatoryCompliance,
        AlertCategory::FinancialIntelligence,
        AlertCategory::GovernmentPrograms,
        AlertCategory::InnovationTracking,
        AlertCategory::CompetitiveIntelligence,
    ];

    /// Categories valid for supplier-intelligence scans.
    pub const SUPPLIER: &'static [AlertCategory] = &[
        AlertCategory::FinancialIntelligence,
        AlertCategory::RegulatoryCompliance,
        AlertCategory::GovernmentPrograms,
        AlertCategory::InnovationTracking,
        AlertCategory::CompetitiveIntelligence,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AlertCategory::Infrastructure => "Infrastructure",
            AlertCategory::Technology => "Technology",
            AlertCategory::Services => "Services",
            AlertCategory::Materials => "Materials",
            AlertCategory::Equipment => "Equipment",
            AlertCategory::MarketTrends => "Market Trends",
            AlertCategory::RegulatoryCompliance => "Regulatory & Compliance",
            AlertCategory::FinancialIntelligence => "Financial Intelligence",
            AlertCategory::GovernmentPrograms => "Government Programs",
            AlertCategory::InnovationTracking => "Innovation Tracking",
            AlertCategory::CompetitiveIntelligence => "Competitive Intelligence",
        }
    }

    /// Match a free-form category string as a language model tends to write it.
    ///
    /// Accepts the full label in any case, plus the short forms offered in the
    /// extraction prompt ("Financial", "Regulatory", "Innovation", ...).
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(" and ", " & ")
            .replace('/', " & ");
        let exact = Self::MARKET
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == normalized);
        if exact.is_some() {
            return exact;
        }
        match normalized.as_str() {
            "financial" | "finance" => Some(AlertCategory::FinancialIntelligence),
            "regulatory" | "compliance" | "regulation" => Some(AlertCategory::RegulatoryCompliance),
            "government" | "government program" | "government programmes" => {
                Some(AlertCategory::GovernmentPrograms)
            }
            "innovation" => Some(AlertCategory::InnovationTracking),
            "competitive" | "competition" => Some(AlertCategory::CompetitiveIntelligence),
            "market trend" | "trends" | "market" => Some(AlertCategory::MarketTrends),
            _ => None,
        }
    }
}

impl From<MarketSector> for AlertCategory {
    fn from(sector: MarketSector) -> Self {
        match sector {
            MarketSector::Infrastructure => AlertCategory::Infrastructure,
            MarketSector::Technology => AlertCategory::Technology,
            MarketSector::Services => AlertCategory::Services,
            MarketSector::Materials => AlertCategory::Materials,
            MarketSector::Equipment => AlertCategory::Equipment,
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl ImpactLevel {
    /// Case-insensitive parse; anything unrecognised is `None`.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(ImpactLevel::High),
            "medium" | "med" | "moderate" => Some(ImpactLevel::Medium),
            "low" => Some(ImpactLevel::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactLevel::High => write!(f, "High"),
            ImpactLevel::Medium => write!(f, "Medium"),
            ImpactLevel::Low => write!(f, "Low"),
        }
    }
}

/// Which extraction path produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertOrigin {
    Model,
    Fallback,
}

/// One structured intelligence item.
///
/// `relevance_score` is always in `[0.0, 1.0]` and `category` always belongs
/// to the enumeration of the scan context that produced it; the extractor
/// enforces both when it builds the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub title: String,
    pub category: AlertCategory,
    pub impact_level: ImpactLevel,
    pub relevance_score: f64,
    pub summary: String,
    pub insights: Vec<String>,
    pub recommended_actions: Vec<String>,
    pub suppliers_mentioned: BTreeSet<String>,
    /// Display domain of the provenance hit.
    pub source: String,
    pub url: String,
    /// Published date of the provenance hit, or `"Recent"` when unknown.
    pub timestamp: String,
    pub origin: AlertOrigin,
    pub generated_at: DateTime<Utc>,
}
