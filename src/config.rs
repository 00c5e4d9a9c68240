use std::path::Path;
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

/// Environment variable consulted by the binary for the provider API key;
/// it takes precedence over the config file value.
pub const API_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";

/// Runtime configuration, normally loaded from a kebab-case YAML file.
/// Every field has a default, so a missing file means a default show.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    /// Photo provider endpoint returning a JSON page of photos.
    #[serde(default = "Configuration::default_endpoint_url")]
    pub endpoint_url: String,
    /// Number of photos requested from the provider.
    #[serde(default = "Configuration::default_page_size")]
    pub page_size: u32,
    /// Delay between automatic advances.
    #[serde(
        default = "Configuration::default_advance_interval",
        with = "humantime_serde"
    )]
    pub advance_interval: Duration,
    /// Provider API key; [`API_KEY_ENV`] wins over this value.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            endpoint_url: Self::default_endpoint_url(),
            page_size: Self::default_page_size(),
            advance_interval: Self::default_advance_interval(),
            api_key: None,
        }
    }
}

impl Configuration {
    fn default_endpoint_url() -> String {
        "https://api.unsplash.com/photos".to_owned()
    }

    const fn default_page_size() -> u32 {
        10
    }

    const fn default_advance_interval() -> Duration {
        Duration::from_secs(10)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate invariants that serde defaults alone cannot express.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            !self.endpoint_url.trim().is_empty(),
            "endpoint-url must not be empty"
        );
        ensure!(self.page_size > 0, "page-size must be greater than zero");
        ensure!(
            self.advance_interval > Duration::ZERO,
            "advance-interval must be positive"
        );
        Ok(self)
    }
}
