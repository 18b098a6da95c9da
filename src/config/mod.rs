use crate::core::refresher::DEFAULT_REFRESH_INTERVAL;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub api_url: String,
    pub port: u16,
    pub refresh_interval: Duration,
    pub upstream_timeout: Duration,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = get("SANITY_API_URL");
        let api_url = validation::validate_required_field("SANITY_API_URL", &api_url)?
            .trim()
            .to_string();

        let port = validation::parse_or_default("PORT", get("PORT").as_deref(), DEFAULT_PORT)?;
        let refresh_secs = validation::parse_or_default(
            "REFRESH_INTERVAL_SECS",
            get("REFRESH_INTERVAL_SECS").as_deref(),
            DEFAULT_REFRESH_INTERVAL.as_secs(),
        )?;
        let timeout_secs = validation::parse_or_default(
            "UPSTREAM_TIMEOUT_SECS",
            get("UPSTREAM_TIMEOUT_SECS").as_deref(),
            DEFAULT_UPSTREAM_TIMEOUT.as_secs(),
        )?;

        let config = Self {
            api_url,
            port,
            refresh_interval: Duration::from_secs(refresh_secs),
            upstream_timeout: Duration::from_secs(timeout_secs),
            log_format: LogFormat::from_env_value(get("LOG_FORMAT").as_deref()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("SANITY_API_URL", &self.api_url)?;
        validation::validate_positive_number("PORT", u64::from(self.port), 1)?;
        validation::validate_positive_number(
            "REFRESH_INTERVAL_SECS",
            self.refresh_interval.as_secs(),
            1,
        )?;
        validation::validate_positive_number(
            "UPSTREAM_TIMEOUT_SECS",
            self.upstream_timeout.as_secs(),
            1,
        )?;
        Ok(())
    }
}

impl ConfigProvider for ServerConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }
}
