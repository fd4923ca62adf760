//! `status`: configuration check without any network call.

use tidemark_core::{AppConfig, Credentials};

pub(crate) fn run_status(config: &AppConfig) -> anyhow::Result<()> {
    let credentials = Credentials::load(&config.secrets_path)?;
    let status = credentials.status();

    println!("environment:   {}", config.env);
    println!("secrets file:  {}", config.secrets_path.display());
    println!("search API:    {}", config.search_base_url);
    println!("model API:     {} ({})", config.llm_base_url, config.llm_model);
    println!("credentials:   {status}");

    if !status.is_configured() {
        tracing::warn!(missing = ?status.missing, "market scanner not configured");
    }
    Ok(())
}
