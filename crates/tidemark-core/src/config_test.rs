use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_environment() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.secrets_path.to_str(), Some("./config/secrets.yaml"));
    assert_eq!(cfg.search_base_url, DEFAULT_SEARCH_BASE_URL);
    assert_eq!(cfg.llm_base_url, DEFAULT_LLM_BASE_URL);
    assert_eq!(cfg.llm_model, "gpt-4o");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.inter_query_delay_ms, 1000);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("TIDEMARK_ENV", "production");
    map.insert("TIDEMARK_LOG_LEVEL", "debug");
    map.insert("TIDEMARK_SEARCH_BASE_URL", "http://127.0.0.1:9000/search");
    map.insert("TIDEMARK_LLM_MODEL", "gpt-4o-mini");
    map.insert("TIDEMARK_INTER_QUERY_DELAY_MS", "0");
    map.insert("TIDEMARK_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.search_base_url, "http://127.0.0.1:9000/search");
    assert_eq!(cfg.llm_model, "gpt-4o-mini");
    assert_eq!(cfg.inter_query_delay_ms, 0);
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn build_app_config_rejects_invalid_delay() {
    let mut map = HashMap::new();
    map.insert("TIDEMARK_INTER_QUERY_DELAY_MS", "one second");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TIDEMARK_INTER_QUERY_DELAY_MS"),
        "expected InvalidEnvVar(TIDEMARK_INTER_QUERY_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("TIDEMARK_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TIDEMARK_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TIDEMARK_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}
