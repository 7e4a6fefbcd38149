//! @ai:module:intent Configuration structs for the outreach console
//! @ai:module:layer infrastructure
//! @ai:module:public_api ConsoleConfig, ApiConfig, ReportConfig
//! @ai:module:stateless true

use crate::error::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_API_BASE: &str = "OUTREACH_API_BASE";
pub const ENV_API_KEY: &str = "OUTREACH_API_KEY";

/// @ai:intent Main configuration for the console
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// @ai:intent Connection settings for the outreach REST API
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Access key sent as `X-API-Key`. Prefer the environment over the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// @ai:intent Output settings for generated reports
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_charts")]
    pub charts: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            charts: default_charts(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_charts() -> bool {
    true
}

impl ConsoleConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConsoleError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Apply OUTREACH_API_BASE / OUTREACH_API_KEY overrides
    /// @ai:effects env
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_BASE).ok(),
            std::env::var(ENV_API_KEY).ok(),
        );
    }

    /// @ai:intent Apply explicit overrides, ignoring blank values
    /// @ai:effects pure
    pub fn apply_overrides(&mut self, base_url: Option<String>, api_key: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }

        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key.trim().to_string());
        }
    }

    /// @ai:intent Reject settings the client cannot work with
    /// @ai:effects pure
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConsoleError::InvalidConfig("api.base_url is empty".to_string()));
        }

        if self.api.timeout_secs == 0 {
            return Err(ConsoleError::InvalidConfig(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
