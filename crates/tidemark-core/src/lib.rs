//! Shared domain types and configuration for the Tidemark market scanner.
//!
//! Holds the scan configuration model, alert records, application settings
//! loaded from the environment, and layered credential resolution.

pub mod alerts;
pub mod app_config;
pub mod config;
pub mod credentials;
pub mod scan;

use thiserror::Error;

pub use alerts::{AlertCategory, AlertOrigin, AlertRecord, ImpactLevel};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::{CredentialStatus, Credentials, ResolvedCredentials};
pub use scan::{
    AlertSensitivity, ContextTrigger, IntelligenceType, MarketSector, Region, ScanCategory,
    ScanConfig, ScanContext, TimeRange, TriggerKind,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read secrets file {path}: {source}")]
    SecretsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secrets file: {0}")]
    SecretsFileParse(#[from] serde_yaml::Error),

    #[error("API credentials not configured: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),
}
