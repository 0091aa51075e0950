//! Configuration management for the inventory API
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset; only fit for development
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Directory holding the collection files
    pub data_dir: PathBuf,

    /// HMAC secret for bearer tokens
    pub jwt_secret: String,

    /// Bearer token lifetime in seconds
    pub token_ttl_secs: i64,

    /// How long a write waits for its collection lock, in milliseconds
    pub write_timeout_ms: u64,

    /// Directory with the single-page frontend, served at `/` when set
    pub static_dir: Option<PathBuf>,

    /// Rewrite plaintext passwords as hashes at startup
    pub migrate_passwords: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            api_host: var("API_HOST", "0.0.0.0"),

            api_port: var("API_PORT", "3000")
                .parse()
                .context("Invalid API_PORT")?,

            data_dir: var("DATA_DIR", "./data/storage").into(),

            jwt_secret: var("JWT_SECRET", DEFAULT_JWT_SECRET),

            token_ttl_secs: var("TOKEN_TTL_SECS", "86400")
                .parse()
                .context("Invalid TOKEN_TTL_SECS")?,

            write_timeout_ms: var("WRITE_TIMEOUT_MS", "5000")
                .parse()
                .context("Invalid WRITE_TIMEOUT_MS")?,

            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),

            migrate_passwords: var("MIGRATE_PASSWORDS", "true")
                .parse()
                .context("Invalid MIGRATE_PASSWORDS (expected true/false)")?,
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        if self.token_ttl_secs <= 0 {
            anyhow::bail!("TOKEN_TTL_SECS must be greater than 0");
        }

        if self.write_timeout_ms == 0 {
            anyhow::bail!("WRITE_TIMEOUT_MS must be greater than 0");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}
