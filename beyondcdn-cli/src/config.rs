use std::path::Path;
use std::time::Duration;

use beyondcdn_client::{ClientConfig, Region};
use serde::Deserialize;

pub const API_KEY_ENV: &str = "BEYONDCDN_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    pub storage_zone: String,
    #[serde(default)]
    pub api_key: String,
    /// Region code such as `ny` or `sg`. Unknown codes use the default region.
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub pull_zone_url: Option<String>,
    #[serde(default)]
    pub prefix: String,
    /// Overrides the regional storage hostname.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let mut config: CliConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        if config.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                config.api_key = key;
            }
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.storage_zone.trim().is_empty() {
            anyhow::bail!("storage_zone must not be empty");
        }
        if self.api_key.is_empty() {
            anyhow::bail!("api_key must be set in the config file or {}", API_KEY_ENV);
        }
        if self.timeout_secs == Some(0) {
            anyhow::bail!("timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn region(&self) -> Region {
        self.region
            .as_deref()
            .map(Region::from_code)
            .unwrap_or_default()
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.storage_zone, &self.api_key);
        config.region = self.region();
        config.endpoint = self.endpoint.clone();
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        config
    }
}
