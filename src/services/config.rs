//! Layered configuration: defaults, `~/.orderdash/config.json`, environment,
//! then command-line flags (later layers win).

use crate::types::{OrderdashError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Backend the dashboard talks to when nothing else is configured
pub const DEFAULT_API_BASE: &str = "https://iluminous-candle-uk-be.onrender.com";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const ENV_API_BASE: &str = "ORDERDASH_API_BASE";
const ENV_TIMEOUT_SECS: &str = "ORDERDASH_TIMEOUT_SECS";
const ENV_LABEL_DIR: &str = "ORDERDASH_LABEL_DIR";

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL without trailing slash
    pub api_base: String,
    pub timeout_secs: u64,
    /// Where downloaded label PDFs are written
    pub label_dir: PathBuf,
}

/// On-disk config file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base: Option<String>,
    timeout_secs: Option<u64>,
    label_dir: Option<PathBuf>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub label_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = app_dir().unwrap_or_else(|_| PathBuf::from(".orderdash"));
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            label_dir: app_dir.join("labels"),
        }
    }
}

impl Config {
    /// Resolve configuration from the default file and process environment
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        Self::load_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup
    pub fn load_with_env<F>(overrides: &ConfigOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let file = match &overrides.config_path {
            Some(path) => Some(Self::read_file(path)?),
            None => match default_config_path() {
                Ok(path) if path.exists() => Some(Self::read_file(&path)?),
                _ => None,
            },
        };
        if let Some(file) = file {
            config.apply_file(file);
        }

        config.apply_env(env)?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| {
            OrderdashError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            OrderdashError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(label_dir) = file.label_dir {
            self.label_dir = label_dir;
        }
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_base) = env(ENV_API_BASE) {
            self.api_base = api_base;
        }
        if let Some(raw) = env(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|_| {
                OrderdashError::Config(format!(
                    "{} must be a whole number, got {:?}",
                    ENV_TIMEOUT_SECS, raw
                ))
            })?;
        }
        if let Some(label_dir) = env(ENV_LABEL_DIR) {
            self.label_dir = PathBuf::from(label_dir);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(api_base) = &overrides.api_base {
            self.api_base = api_base.clone();
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(label_dir) = &overrides.label_dir {
            self.label_dir = label_dir.clone();
        }
    }

    fn validate(&mut self) -> Result<()> {
        let trimmed = self.api_base.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(OrderdashError::Config(format!(
                "api_base must be an http(s) URL, got {:?}",
                self.api_base
            )));
        }
        self.api_base = trimmed.to_string();

        if self.timeout_secs == 0 {
            return Err(OrderdashError::Config(
                "timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Application directory (~/.orderdash)
pub fn app_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| OrderdashError::Config("Failed to get home directory".into()))?
        .home_dir()
        .to_path_buf();
    Ok(home.join(".orderdash"))
}

/// Default config file path (~/.orderdash/config.json)
pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_dir()?.join("config.json"))
}
