use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_SEARCH_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";
pub const DEFAULT_USER_AGENT: &str = "tidemark/0.1 (market-intelligence)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so the only failure mode is a value that does
/// not parse.
pub(crate) fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("TIDEMARK_ENV", "development"));
    let log_level = or_default("TIDEMARK_LOG_LEVEL", "info");
    let secrets_path = PathBuf::from(or_default(
        "TIDEMARK_SECRETS_PATH",
        "./config/secrets.yaml",
    ));
    let search_base_url = or_default("TIDEMARK_SEARCH_BASE_URL", DEFAULT_SEARCH_BASE_URL);
    let llm_base_url = or_default("TIDEMARK_LLM_BASE_URL", DEFAULT_LLM_BASE_URL);
    let llm_model = or_default("TIDEMARK_LLM_MODEL", DEFAULT_LLM_MODEL);
    let request_timeout_secs = parse_u64("TIDEMARK_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_query_delay_ms = parse_u64("TIDEMARK_INTER_QUERY_DELAY_MS", "1000")?;
    let user_agent = or_default("TIDEMARK_USER_AGENT", DEFAULT_USER_AGENT);

    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TIDEMARK_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        secrets_path,
        search_base_url,
        llm_base_url,
        llm_model,
        request_timeout_secs,
        inter_query_delay_ms,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
pub(crate) fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
