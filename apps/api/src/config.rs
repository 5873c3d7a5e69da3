use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8880";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // `key` is the variable name older deployments used.
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("key"))
            .filter(|k| !k.trim().is_empty())
            .context("Required environment variable 'GEMINI_API_KEY' is not set")?;

        Ok(Config {
            gemini_api_key,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
