/*
[INPUT]:  YAML configuration file, environment variables
[OUTPUT]: Parsed CLI configuration (sidecar location, venue credentials)
[POS]:    Configuration layer - exchange setup
[UPDATE]: When adding new configuration options or environment overrides
*/

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use pmxt_adapter::{ClientConfig, ExchangeCredentials, ExchangeOptions, SignatureType, Venue};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the pmxt CLI
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub sidecar: SidecarConfig,
    #[serde(default)]
    pub venues: VenuesConfig,
}

/// Where the sidecar lives and how to reach it
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SidecarConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Launch the sidecar when it is not answering
    #[serde(default = "default_auto_start")]
    pub auto_start: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auto_start: default_auto_start(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Per-venue credentials
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VenuesConfig {
    #[serde(default)]
    pub polymarket: VenueConfig,
    #[serde(default)]
    pub kalshi: VenueConfig,
    #[serde(default)]
    pub limitless: VenueConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VenueConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub private_key: Option<String>,
    /// Polymarket proxy / smart-wallet address
    #[serde(default)]
    pub proxy_address: Option<String>,
    #[serde(default)]
    pub signature_type: Option<SignatureType>,
}

fn default_base_url() -> String {
    pmxt_adapter::http::DEFAULT_BASE_URL.to_string()
}

fn default_auto_start() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load configuration from YAML file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }

    /// Environment wins over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var("PMXT_BASE_URL") {
            self.sidecar.base_url = url;
        }
        if let Some(key) = var("POLYMARKET_PRIVATE_KEY") {
            self.venues.polymarket.private_key = Some(key);
        }
        if let Some(key) = var("KALSHI_API_KEY") {
            self.venues.kalshi.api_key = Some(key);
        }
        if let Some(key) = var("KALSHI_PRIVATE_KEY") {
            self.venues.kalshi.private_key = Some(key);
        }
        if let Some(key) = var("LIMITLESS_PRIVATE_KEY") {
            self.venues.limitless.private_key = Some(key);
        }
    }

    pub fn venue(&self, venue: Venue) -> &VenueConfig {
        match venue {
            Venue::Polymarket => &self.venues.polymarket,
            Venue::Kalshi => &self.venues.kalshi,
            Venue::Limitless => &self.venues.limitless,
        }
    }

    pub fn credentials(&self, venue: Venue) -> ExchangeCredentials {
        let venue = self.venue(venue);
        ExchangeCredentials {
            api_key: venue.api_key.clone(),
            private_key: venue.private_key.clone(),
            proxy_address: venue.proxy_address.clone(),
            signature_type: venue.signature_type,
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.sidecar.timeout_secs),
            ..ClientConfig::default()
        }
    }

    pub fn exchange_options(&self, venue: Venue) -> ExchangeOptions {
        ExchangeOptions {
            base_url: self.sidecar.base_url.clone(),
            auto_start_server: self.sidecar.auto_start,
            client_config: self.client_config(),
            credentials: self.credentials(venue),
            lock_path: None,
        }
    }
}
