use crate::error::{Result, SchemaError};
use config::{builder::DefaultState, Config as Cfg, ConfigBuilder, Environment, File};
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

/// Connection and tooling settings for an identity tenant.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Tenant subdomain, e.g. `dev-123456`.
    #[serde(default)]
    pub org_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_token: Secret<String>,
    /// Full API URL; takes precedence over `org_name` + `base_url`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Index prefix of properties the sweeper is allowed to remove.
    #[serde(default = "default_sweep_prefix")]
    pub sweep_prefix: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "okta.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_sweep_prefix() -> String {
    "testAcc".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from an optional `configuration` file, then `OKTA_*` env vars.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_builder(
            Cfg::builder()
                .add_source(File::with_name("configuration").required(false))
                .add_source(Environment::with_prefix("OKTA")),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Base URL of the tenant's API, without a trailing slash.
    pub fn api_url(&self) -> Result<String> {
        if let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }
        if self.org_name.is_empty() {
            return Err(SchemaError::ConfigError(anyhow::anyhow!(
                "either endpoint or org_name must be set"
            )));
        }
        Ok(format!("https://{}.{}", self.org_name, self.base_url))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
