use anyhow::{Context, Result};

const DEFAULT_ZEP_BASE_URL: &str = "https://api.getzep.com";
const DEFAULT_HUME_BASE_URL: &str = "https://api.hume.ai";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    /// Zep graph service. When unset, graph requests always use the local fallback.
    pub zep_api_key: Option<String>,
    pub zep_base_url: String,
    /// Hume EVI credentials, held server-side and never sent to the browser.
    pub hume_api_key: Option<String>,
    pub hume_config_id: Option<String>,
    pub hume_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            zep_api_key: optional_env("ZEP_API_KEY"),
            zep_base_url: optional_env("ZEP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ZEP_BASE_URL.to_string()),
            hume_api_key: optional_env("HUME_API_KEY"),
            hume_config_id: optional_env("HUME_CONFIG_ID"),
            hume_base_url: optional_env("HUME_BASE_URL")
                .unwrap_or_else(|| DEFAULT_HUME_BASE_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats empty values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
