//! Client configuration: defaults, then an optional YAML file, then
//! `KYC_*` environment variables.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::KycReportError;
use crate::KycReportResult;

pub const ENV_CONFIG_PATH: &str = "KYC_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "kyc.yaml";

const ENV_BASE_URL: &str = "KYC_API_BASE_URL";
const ENV_TIMEOUT_MS: &str = "KYC_API_TIMEOUT_MS";
const ENV_USE_FIXTURES: &str = "KYC_USE_FIXTURES";
const ENV_MIN_DISPLAY_MS: &str = "KYC_MIN_DISPLAY_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the KYC service, without trailing slash.
    pub base_url: String,
    pub timeout_ms: u64,
    /// Fall back to embedded demo data when the service is unreachable.
    pub use_fixtures: bool,
    /// Minimum time the investigation progress display stays up.
    pub min_display_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 10_000,
            use_fixtures: true,
            min_display_ms: 15_000,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn min_display(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(contents: &str) -> KycReportResult<Self> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(ClientConfig::default());
        }
        let mut config: ClientConfig = serde_yaml::from_str(contents)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Load from `path`, else `KYC_CONFIG_PATH`, else `kyc.yaml`. Only an
    /// explicitly passed file has to exist.
    pub fn load(path: Option<&Path>) -> KycReportResult<Self> {
        let explicit = path.is_some();
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        let path = match (path, env_path.as_deref()) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) => Path::new(p).to_path_buf(),
            (None, None) => Path::new(DEFAULT_CONFIG_PATH).to_path_buf(),
        };
        if !path.exists() {
            if explicit {
                return Err(KycReportError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(ClientConfig::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| KycReportError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), "loaded configuration from file");
        Ok(config)
    }

    /// Apply `KYC_*` environment overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Unparseable values are
    /// ignored with a warning.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = parse_env(&lookup, ENV_TIMEOUT_MS) {
            self.timeout_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, ENV_MIN_DISPLAY_MS) {
            self.min_display_ms = ms;
        }
        if let Some(raw) = lookup(ENV_USE_FIXTURES) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.use_fixtures = true,
                "0" | "false" | "no" | "off" => self.use_fixtures = false,
                other => warn!(var = ENV_USE_FIXTURES, value = other, "ignoring invalid boolean"),
            }
        }
        self
    }
}

fn parse_env<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = key, value = %raw, "ignoring invalid number");
            None
        }
    }
}
