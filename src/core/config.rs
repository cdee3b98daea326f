use anyhow::{Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CBR_BASE_URL: &str = "http://www.cbr.ru";
pub const DEFAULT_BASE_CURRENCY: &str = "RUB";
pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CbrProviderConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CbrProviderConfig {
    fn default() -> Self {
        CbrProviderConfig {
            base_url: DEFAULT_CBR_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    pub cbr: Option<CbrProviderConfig>,
}

/// How responses are rendered by the HTTP server.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

/// When the server fetches the rate feed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Fetch once before the server starts listening and serve that snapshot.
    #[default]
    Startup,
    /// Fetch a fresh table for every request.
    PerRequest,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            format: OutputFormat::default(),
            refresh: RefreshPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            providers: ProvidersConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "kurs", "kurs")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Settings of the rate feed provider, defaults included.
    pub fn cbr(&self) -> CbrProviderConfig {
        self.providers.cbr.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
base_currency: "RUB"
providers:
  cbr:
    base_url: "http://example.com/cbr"
    timeout_secs: 3
server:
  port: 9999
  format: json
  refresh: per-request
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_currency, "RUB");
        let cbr = config.cbr();
        assert_eq!(cbr.base_url, "http://example.com/cbr");
        assert_eq!(cbr.timeout_secs, 3);
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.format, OutputFormat::Json);
        assert_eq!(config.server.refresh, RefreshPolicy::PerRequest);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.base_currency, "RUB");
        assert!(config.providers.cbr.is_none());
        assert_eq!(config.cbr().base_url, DEFAULT_CBR_BASE_URL);
        assert_eq!(config.cbr().timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.format, OutputFormat::Html);
        assert_eq!(config.server.refresh, RefreshPolicy::Startup);

        let yaml_str = r#"
providers:
  cbr:
    base_url: "http://localhost:1234"
server:
  format: html
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.cbr().timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_config_rejects_unknown_format() {
        let yaml_str = r#"
server:
  format: xml
"#;
        assert!(serde_yaml::from_str::<AppConfig>(yaml_str).is_err());
    }
}
