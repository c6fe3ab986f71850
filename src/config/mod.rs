use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use tracing::warn;

/// Shared secret used when `API_KEY` is not set.
pub const DEFAULT_API_KEY: &str = "my_secret_api_key_12345";

/// Configuration for the service
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// SQLite connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Shared secret clients present in the `x-api-key` header
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Upper bound on pooled database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://invoices.db".to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            api_key: default_api_key(),
            bind_addr: default_bind_addr(),
            max_connections: default_max_connections(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Whether the service is running with the built-in shared secret
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    if config.uses_default_api_key() {
        warn!("API_KEY is not set; falling back to the built-in default key");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_missing_variable() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();

        assert_eq!(config.database_url(), "sqlite://invoices.db");
        assert_eq!(config.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.max_connections, 5);
        assert!(config.uses_default_api_key());
    }

    #[test]
    fn environment_values_override_defaults() {
        let vars = vec![
            ("API_KEY".to_string(), "s3cret".to_string()),
            ("DATABASE_URL".to_string(), "sqlite://other.db".to_string()),
            ("MAX_CONNECTIONS".to_string(), "2".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.api_key, "s3cret");
        assert_eq!(config.database_url(), "sqlite://other.db");
        assert_eq!(config.max_connections, 2);
        assert!(!config.uses_default_api_key());
    }
}
