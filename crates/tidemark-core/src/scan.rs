//! Scan configuration model: what to look for, where, and over which window.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alerts::{AlertCategory, ImpactLevel};

/// Geography used when a configuration names none.
pub const DEFAULT_GEOGRAPHY: &str = "UK";
/// Industry used by category query templates when a configuration names none.
pub const DEFAULT_INDUSTRY: &str = "infrastructure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "North America")]
    NorthAmerica,
    Global,
}

impl Region {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Region::Uk => "UK",
            Region::Eu => "EU",
            Region::NorthAmerica => "North America",
            Region::Global => "Global",
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uk" | "united kingdom" => Ok(Region::Uk),
            "eu" | "europe" => Ok(Region::Eu),
            "north america" | "north-america" | "na" => Ok(Region::NorthAmerica),
            "global" => Ok(Region::Global),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "Last 3 months")]
    Last3Months,
    #[serde(rename = "Last 6 months")]
    Last6Months,
    #[serde(rename = "Custom range")]
    Custom,
}

impl TimeRange {
    /// Search-provider date restriction code for this window.
    #[must_use]
    pub fn date_restrict(self) -> &'static str {
        match self {
            TimeRange::Last6Months => "m6",
            TimeRange::Last3Months | TimeRange::Custom => "m3",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "3m" | "last 3 months" => Ok(TimeRange::Last3Months),
            "6m" | "last 6 months" => Ok(TimeRange::Last6Months),
            "custom" | "custom range" => Ok(TimeRange::Custom),
            other => Err(format!("unknown time range: {other}")),
        }
    }
}

/// Minimum impact level a consumer wants to see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSensitivity {
    #[serde(rename = "High priority only")]
    HighOnly,
    #[default]
    #[serde(rename = "Medium and high")]
    MediumAndHigh,
    #[serde(rename = "All levels")]
    All,
}

impl AlertSensitivity {
    #[must_use]
    pub fn admits(self, impact: ImpactLevel) -> bool {
        match self {
            AlertSensitivity::HighOnly => impact == ImpactLevel::High,
            AlertSensitivity::MediumAndHigh => impact != ImpactLevel::Low,
            AlertSensitivity::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketSector {
    Infrastructure,
    Technology,
    Services,
    Materials,
    Equipment,
}

impl MarketSector {
    pub const ALL: [MarketSector; 5] = [
        MarketSector::Infrastructure,
        MarketSector::Technology,
        MarketSector::Services,
        MarketSector::Materials,
        MarketSector::Equipment,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            MarketSector::Infrastructure => "Infrastructure",
            MarketSector::Technology => "Technology",
            MarketSector::Services => "Services",
            MarketSector::Materials => "Materials",
            MarketSector::Equipment => "Equipment",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            MarketSector::Infrastructure => "infrastructure",
            MarketSector::Technology => "technology",
            MarketSector::Services => "services",
            MarketSector::Materials => "materials",
            MarketSector::Equipment => "equipment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntelligenceType {
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

impl IntelligenceType {
    pub const ALL: [IntelligenceType; 6] = [
        IntelligenceType::MarketTrends,
        IntelligenceType::RegulatoryCompliance,
        IntelligenceType::FinancialIntelligence,
        IntelligenceType::GovernmentPrograms,
        IntelligenceType::InnovationTracking,
        IntelligenceType::CompetitiveIntelligence,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        self.alert_category().label()
    }

    #[must_use]
    pub fn alert_category(self) -> AlertCategory {
        match self {
            IntelligenceType::MarketTrends => AlertCategory::MarketTrends,
            IntelligenceType::RegulatoryCompliance => AlertCategory::RegulatoryCompliance,
            IntelligenceType::FinancialIntelligence => AlertCategory::FinancialIntelligence,
            IntelligenceType::GovernmentPrograms => AlertCategory::GovernmentPrograms,
            IntelligenceType::InnovationTracking => AlertCategory::InnovationTracking,
            IntelligenceType::CompetitiveIntelligence => AlertCategory::CompetitiveIntelligence,
        }
    }

    fn slug(self) -> &'static str {
        match self {
            IntelligenceType::MarketTrends => "market-trends",
            IntelligenceType::RegulatoryCompliance => "regulatory-compliance",
            IntelligenceType::FinancialIntelligence => "financial-intelligence",
            IntelligenceType::GovernmentPrograms => "government-programs",
            IntelligenceType::InnovationTracking => "innovation-tracking",
            IntelligenceType::CompetitiveIntelligence => "competitive-intelligence",
        }
    }
}

/// Which alert-category enumeration a scan may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanContext {
    Market,
    Supplier,
}

impl ScanContext {
    #[must_use]
    pub fn categories(self) -> &'static [AlertCategory] {
        match self {
            ScanContext::Market => AlertCategory::MARKET,
            ScanContext::Supplier => AlertCategory::SUPPLIER,
        }
    }

    #[must_use]
    pub fn allows(self, category: AlertCategory) -> bool {
        self.categories().contains(&category)
    }

    /// Category used when nothing more specific is valid.
    #[must_use]
    pub fn default_category(self) -> AlertCategory {
        match self {
            ScanContext::Market => AlertCategory::MarketTrends,
            ScanContext::Supplier => AlertCategory::CompetitiveIntelligence,
        }
    }
}

/// A named partition of intelligence gathering; the Alert Store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ScanCategory {
    General,
    Market(MarketSector),
    Supplier(IntelligenceType),
}

impl ScanCategory {
    #[must_use]
    pub fn context(self) -> ScanContext {
        match self {
            ScanCategory::General | ScanCategory::Market(_) => ScanContext::Market,
            ScanCategory::Supplier(_) => ScanContext::Supplier,
        }
    }

    /// The alert category this scan would assign by default, always valid for
    /// [`Self::context`].
    #[must_use]
    pub fn default_alert_category(self) -> AlertCategory {
        let own = match self {
            ScanCategory::General => None,
            ScanCategory::Market(sector) => Some(AlertCategory::from(sector)),
            ScanCategory::Supplier(kind) => Some(kind.alert_category()),
        };
        let context = self.context();
        own.filter(|c| context.allows(*c))
            .unwrap_or_else(|| context.default_category())
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ScanCategory::General => "General",
            ScanCategory::Market(sector) => sector.label(),
            ScanCategory::Supplier(kind) => kind.label(),
        }
    }
}

impl std::fmt::Display for ScanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanCategory::General => write!(f, "general"),
            ScanCategory::Market(sector) => write!(f, "market:{}", sector.slug()),
            ScanCategory::Supplier(kind) => write!(f, "supplier:{}", kind.slug()),
        }
    }
}

impl FromStr for ScanCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "general" {
            return Ok(ScanCategory::General);
        }
        let (kind, value) = normalized
            .split_once(':')
            .ok_or_else(|| format!("invalid scan category '{s}': expected general, market:<sector> or supplier:<type>"))?;
        match kind {
            "market" => MarketSector::ALL
                .into_iter()
                .find(|sector| sector.slug() == value)
                .map(ScanCategory::Market)
                .ok_or_else(|| format!("unknown market sector: {value}")),
            "supplier" => IntelligenceType::ALL
                .into_iter()
                .find(|kind| kind.slug() == value)
                .map(ScanCategory::Supplier)
                .ok_or_else(|| format!("unknown intelligence type: {value}")),
            other => Err(format!("unknown scan category kind: {other}")),
        }
    }
}

/// One-shot instruction from another panel to scope the next scan to a
/// specific named entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTrigger {
    pub kind: TriggerKind,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    SourcingPackage,
}

impl ContextTrigger {
    #[must_use]
    pub fn sourcing_package(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            kind: TriggerKind::SourcingPackage,
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Immutable per-invocation configuration, created by the calling layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub geographic_scope: BTreeSet<Region>,
    #[serde(default)]
    pub time_range: TimeRange,
    /// Free-text geography placed at the head of the primary query.
    #[serde(default)]
    pub geo_focus: Option<String>,
    #[serde(default)]
    pub industry_sector: Option<String>,
    #[serde(default)]
    pub sub_sectors: Vec<String>,
    #[serde(default)]
    pub market_categories: Vec<MarketSector>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub suppliers: Vec<String>,
    #[serde(default)]
    pub intelligence_types: Vec<IntelligenceType>,
    #[serde(default)]
    pub alert_sensitivity: AlertSensitivity,
}

impl ScanConfig {
    /// Whether results should be filtered to the United Kingdom.
    #[must_use]
    pub fn is_uk_scoped(&self) -> bool {
        self.geographic_scope.contains(&Region::Uk)
    }

    #[must_use]
    pub fn industry(&self) -> &str {
        self.industry_sector
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_INDUSTRY)
    }

    /// Geography phrase used inside query templates.
    #[must_use]
    pub fn geo_label(&self) -> &str {
        self.geo_focus
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_GEOGRAPHY)
    }
}

impl FromStr for MarketSector {
    type Err = String;

    /// Accepts the slug or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        MarketSector::ALL
            .into_iter()
            .find(|sector| sector.slug() == normalized || sector.label().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown market sector: {s}"))
    }
}

impl FromStr for IntelligenceType {
    type Err = String;

    /// Accepts the slug (`financial-intelligence`) or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        IntelligenceType::ALL
            .into_iter()
            .find(|kind| kind.slug() == normalized || kind.label().to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown intelligence type: {s}"))
    }
}

impl FromStr for AlertSensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "high priority only" => Ok(AlertSensitivity::HighOnly),
            "medium" | "medium and high" => Ok(AlertSensitivity::MediumAndHigh),
            "all" | "all levels" => Ok(AlertSensitivity::All),
            other => Err(format!("unknown alert sensitivity: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_category_keys_round_trip_through_from_str() {
        let samples = [
            ScanCategory::General,
            ScanCategory::Market(MarketSector::Materials),
            ScanCategory::Supplier(IntelligenceType::RegulatoryCompliance),
        ];
        for category in samples {
            let key = category.to_string();
            assert_eq!(key.parse::<ScanCategory>().unwrap(), category, "key {key}");
        }
    }

    #[test]
    fn scan_category_rejects_unknown_sector() {
        assert!("market:plumbing".parse::<ScanCategory>().is_err());
        assert!("infrastructure".parse::<ScanCategory>().is_err());
    }

    #[test]
    fn supplier_market_trends_defaults_into_supplier_enumeration() {
        let category = ScanCategory::Supplier(IntelligenceType::MarketTrends);
        assert_eq!(
            category.default_alert_category(),
            AlertCategory::CompetitiveIntelligence
        );
        assert!(ScanContext::Supplier.allows(category.default_alert_category()));
    }

    #[test]
    fn market_sector_scan_defaults_to_its_own_category() {
        let category = ScanCategory::Market(MarketSector::Equipment);
        assert_eq!(category.default_alert_category(), AlertCategory::Equipment);
        assert_eq!(
            ScanCategory::General.default_alert_category(),
            AlertCategory::MarketTrends
        );
    }

    #[test]
    fn sector_and_type_parse_from_slug_or_label() {
        assert_eq!("materials".parse::<MarketSector>().unwrap(), MarketSector::Materials);
        assert_eq!("Technology".parse::<MarketSector>().unwrap(), MarketSector::Technology);
        assert_eq!(
            "innovation-tracking".parse::<IntelligenceType>().unwrap(),
            IntelligenceType::InnovationTracking
        );
        assert_eq!(
            "Regulatory & Compliance".parse::<IntelligenceType>().unwrap(),
            IntelligenceType::RegulatoryCompliance
        );
        assert!("plumbing".parse::<MarketSector>().is_err());
        assert_eq!(
            "high".parse::<AlertSensitivity>().unwrap(),
            AlertSensitivity::HighOnly
        );
    }

    #[test]
    fn time_range_maps_to_date_restrict_codes() {
        assert_eq!(TimeRange::Last3Months.date_restrict(), "m3");
        assert_eq!(TimeRange::Last6Months.date_restrict(), "m6");
        assert_eq!(TimeRange::Custom.date_restrict(), "m3");
    }

    #[test]
    fn sensitivity_filters_by_impact() {
        assert!(AlertSensitivity::HighOnly.admits(ImpactLevel::High));
        assert!(!AlertSensitivity::HighOnly.admits(ImpactLevel::Medium));
        assert!(AlertSensitivity::MediumAndHigh.admits(ImpactLevel::Medium));
        assert!(!AlertSensitivity::MediumAndHigh.admits(ImpactLevel::Low));
        assert!(AlertSensitivity::All.admits(ImpactLevel::Low));
    }

    #[test]
    fn scan_config_deserializes_display_names() {
        let json = r#"{
            "geographic_scope": ["UK", "North America"],
            "time_range": "Last 6 months",
            "market_categories": ["Infrastructure"],
            "intelligence_types": ["Regulatory & Compliance"],
            "alert_sensitivity": "All levels"
        }"#;
        let config: ScanConfig = serde_json::from_str(json).unwrap();
        assert!(config.is_uk_scoped());
        assert!(config.geographic_scope.contains(&Region::NorthAmerica));
        assert_eq!(config.time_range, TimeRange::Last6Months);
        assert_eq!(config.market_categories, vec![MarketSector::Infrastructure]);
        assert_eq!(
            config.intelligence_types,
            vec![IntelligenceType::RegulatoryCompliance]
        );
        assert_eq!(config.alert_sensitivity, AlertSensitivity::All);
        assert_eq!(config.industry(), DEFAULT_INDUSTRY);
        assert_eq!(config.geo_label(), DEFAULT_GEOGRAPHY);
    }
}
