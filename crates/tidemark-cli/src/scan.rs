//! `scan`: build a [`ScanConfig`] from flags, run one scan, print JSON.

use std::collections::BTreeSet;

use clap::Args;
use tidemark_core::{
    AlertSensitivity, AppConfig, ContextTrigger, Credentials, IntelligenceType, MarketSector,
    Region, ScanCategory, ScanConfig, TimeRange,
};
use tidemark_scanner::{run_market_scan, ScanSession};

#[derive(Debug, Args)]
pub(crate) struct ScanArgs {
    /// Scan category key: general, market:<sector> or supplier:<type>
    #[arg(long, default_value = "general")]
    pub category: ScanCategory,

    /// Geographic scope; repeatable (UK, EU, North America, Global). Defaults to UK.
    #[arg(long = "geo")]
    pub geo: Vec<Region>,

    /// Free-text geography placed at the head of the primary query
    #[arg(long)]
    pub geo_focus: Option<String>,

    /// Industry named in category templates (defaults to "infrastructure")
    #[arg(long)]
    pub industry: Option<String>,

    /// Sub-sector tag; repeatable
    #[arg(long = "sub-sector")]
    pub sub_sectors: Vec<String>,

    /// Market sector tag; repeatable
    #[arg(long = "sector")]
    pub sectors: Vec<MarketSector>,

    /// Supplier name; repeatable
    #[arg(long = "supplier")]
    pub suppliers: Vec<String>,

    /// Intelligence type tag; repeatable
    #[arg(long = "intel-type")]
    pub intelligence_types: Vec<IntelligenceType>,

    #[arg(long)]
    pub keywords: Option<String>,

    /// Refinement keywords appended to this scan's queries
    #[arg(long)]
    pub refine: Option<String>,

    /// 3m, 6m or custom
    #[arg(long, default_value = "3m")]
    pub time_range: TimeRange,

    /// Minimum impact printed: high, medium or all
    #[arg(long, default_value = "medium")]
    pub sensitivity: AlertSensitivity,

    /// Name of a sourcing package to scope this scan to
    #[arg(long, requires = "trigger_category")]
    pub trigger_name: Option<String>,

    #[arg(long, requires = "trigger_name")]
    pub trigger_category: Option<String>,
}

impl ScanArgs {
    pub(crate) fn scan_config(&self) -> ScanConfig {
        let geographic_scope: BTreeSet<Region> = if self.geo.is_empty() {
            BTreeSet::from([Region::Uk])
        } else {
            self.geo.iter().copied().collect()
        };

        ScanConfig {
            geographic_scope,
            time_range: self.time_range,
            geo_focus: self.geo_focus.clone(),
            industry_sector: self.industry.clone(),
            sub_sectors: self.sub_sectors.clone(),
            market_categories: self.sectors.clone(),
            keywords: self.keywords.clone(),
            suppliers: self.suppliers.clone(),
            intelligence_types: self.intelligence_types.clone(),
            alert_sensitivity: self.sensitivity,
        }
    }

    pub(crate) fn trigger(&self) -> Option<ContextTrigger> {
        match (&self.trigger_name, &self.trigger_category) {
            (Some(name), Some(category)) => {
                Some(ContextTrigger::sourcing_package(name.clone(), category.clone()))
            }
            _ => None,
        }
    }
}

pub(crate) async fn run_scan(config: &AppConfig, args: ScanArgs) -> anyhow::Result<()> {
    let credentials = Credentials::load(&config.secrets_path)?;
    let status = credentials.status();
    if !status.is_configured() {
        anyhow::bail!("market scanner {status}");
    }

    let scan_config = args.scan_config();
    let session = ScanSession::new();
    if let Some(trigger) = args.trigger() {
        session.set_trigger(trigger);
    }

    let mut report = run_market_scan(
        config,
        &credentials,
        &session,
        args.category,
        &scan_config,
        args.refine.as_deref(),
    )
    .await?;

    for warning in &report.warnings {
        tracing::warn!(category = %report.category, "{warning}");
    }

    report.alerts = session
        .alerts()
        .get_filtered(args.category, scan_config.alert_sensitivity);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
