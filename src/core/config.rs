use crate::core::rate::DEFAULT_CURRENCIES;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PrivatBankProviderConfig {
    pub base_url: String,
    /// Extra attempts after a transport error. Error statuses are not retried.
    pub retries: usize,
}

impl Default for PrivatBankProviderConfig {
    fn default() -> Self {
        PrivatBankProviderConfig {
            base_url: "https://api.privatbank.ua".to_string(),
            retries: 2,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProvidersConfig {
    pub privatbank: PrivatBankProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub providers: ProvidersConfig,
    /// Currencies reported when an `exchange` command names none.
    pub currencies: Vec<String>,
    /// Append-only journal of every inbound message.
    pub message_log: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            server: ServerConfig::default(),
            providers: ProvidersConfig::default(),
            currencies: DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect(),
            message_log: PathBuf::from("log.txt"),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or defaults when there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "ratechat", "ratechat")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
server:
  host: "0.0.0.0"
  port: 9000
providers:
  privatbank:
    base_url: "http://example.com/privat"
    retries: 0
currencies: ["PLN", "GBP"]
message_log: "/var/log/ratechat.txt"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.server.address(), "0.0.0.0:9000");
        assert_eq!(
            config.providers.privatbank.base_url,
            "http://example.com/privat"
        );
        assert_eq!(config.providers.privatbank.retries, 0);
        assert_eq!(config.currencies, vec!["PLN", "GBP"]);
        assert_eq!(config.message_log, PathBuf::from("/var/log/ratechat.txt"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml_str = r#"
server:
  port: 9100
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 9100);
        assert_eq!(
            config.providers.privatbank.base_url,
            "https://api.privatbank.ua"
        );
        assert_eq!(config.currencies, vec!["USD", "EUR"]);
        assert_eq!(config.message_log, PathBuf::from("log.txt"));
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "currencies: [chf]\n")?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.currencies, vec!["chf"]);
        assert_eq!(config.server, ServerConfig::default());

        fs::write(file.path(), "")?;
        assert_eq!(AppConfig::load_from_path(file.path())?, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("missing.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
