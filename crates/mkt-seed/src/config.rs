//! Tool configuration loaded from a TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! portal_url = "https://portal.example.test/api/v1"
//!
//! [executor]
//! concurrency = 8
//! page_size = 100
//! retry_delays_ms = [500, 2000, 5000]
//!
//! [environments.sandbox]
//! api_url = "https://sandbox.example.test/v1"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mkt_client::{DEFAULT_PORTAL_URL, Environment};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "MKT_SEED_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    pub portal_url: Option<String>,
    pub executor: ExecutorSettings,
    /// Keyed by lowercase environment name.
    pub environments: BTreeMap<String, EnvironmentOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorSettings {
    /// Ceiling on in-flight platform requests for the whole run.
    pub concurrency: usize,
    pub page_size: u32,
    /// Wait before each retry; its length is the number of retries.
    pub retry_delays_ms: Vec<u64>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            concurrency: 8,
            page_size: 100,
            retry_delays_ms: vec![500, 2000, 5000],
        }
    }
}

impl ExecutorSettings {
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentOverride {
    pub api_url: Option<String>,
}

impl SeedConfig {
    /// Loads `path`, else the file named by [`CONFIG_ENV_VAR`], else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => {
                    tracing::debug!("no configuration file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::parse(path, &contents)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| SeedError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.executor.concurrency == 0 || config.executor.page_size == 0 {
            return Err(SeedError::Config {
                path: path.to_path_buf(),
                message: "executor concurrency and page_size must be at least 1".to_string(),
            });
        }
        if let Some(unknown) = config
            .environments
            .keys()
            .find(|name| name.parse::<Environment>().is_err())
        {
            return Err(SeedError::Config {
                path: path.to_path_buf(),
                message: format!("unknown environment \"{unknown}\""),
            });
        }
        Ok(config)
    }

    /// Platform API base URL for `environment`, honoring overrides.
    pub fn api_url(&self, environment: Environment) -> String {
        self.environments
            .iter()
            .find(|(name, _)| name.parse::<Environment>().ok() == Some(environment))
            .and_then(|(_, entry)| entry.api_url.clone())
            .unwrap_or_else(|| environment.api_url().to_string())
    }

    pub fn portal_url(&self) -> &str {
        self.portal_url.as_deref().unwrap_or(DEFAULT_PORTAL_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SeedConfig::parse(Path::new("seed.toml"), "").expect("parse");
        assert_eq!(config, SeedConfig::default());
        assert_eq!(config.executor.retry_delays().len(), 3);
        assert_eq!(config.portal_url(), DEFAULT_PORTAL_URL);
        assert_eq!(
            config.api_url(Environment::Sandbox),
            Environment::Sandbox.api_url()
        );
    }

    #[test]
    fn overrides_apply_per_environment() {
        let config = SeedConfig::parse(
            Path::new("seed.toml"),
            r#"
portal_url = "http://localhost:9000/portal"

[executor]
concurrency = 2
retry_delays_ms = [10]

[environments.Staging]
api_url = "http://localhost:9000/v1"
"#,
        )
        .expect("parse");
        assert_eq!(config.executor.concurrency, 2);
        assert_eq!(config.executor.page_size, 100);
        assert_eq!(config.executor.retry_delays(), vec![Duration::from_millis(10)]);
        assert_eq!(config.portal_url(), "http://localhost:9000/portal");
        assert_eq!(
            config.api_url(Environment::Staging),
            "http://localhost:9000/v1"
        );
        assert_eq!(
            config.api_url(Environment::Production),
            Environment::Production.api_url()
        );
    }

    #[test]
    fn rejects_unknown_keys_and_environments() {
        assert!(SeedConfig::parse(Path::new("a.toml"), "colour = true").is_err());
        let error = SeedConfig::parse(Path::new("a.toml"), "[environments.moon]\n")
            .expect_err("unknown environment");
        assert!(error.to_string().contains("unknown environment \"moon\""));
        assert!(SeedConfig::parse(Path::new("a.toml"), "[executor]\nconcurrency = 0\n").is_err());
    }
}
