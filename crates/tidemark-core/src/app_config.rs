use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings for the scanner and its HTTP clients.
///
/// Credentials are not part of this struct; they are resolved separately by
/// [`crate::credentials::Credentials`] so a missing key never fails config
/// loading.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub secrets_path: PathBuf,
    pub search_base_url: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub request_timeout_secs: u64,
    pub inter_query_delay_ms: u64,
    pub user_agent: String,
}
