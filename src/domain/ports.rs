use crate::domain::model::QueryResponse;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Where property documents come from.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Runs the "all properties" query and returns the decoded envelope.
    async fn fetch(&self) -> Result<QueryResponse>;

    /// Human-readable name used in log lines.
    fn source_name(&self) -> &str;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> &str;
    fn port(&self) -> u16;
    fn refresh_interval(&self) -> Duration;
    fn upstream_timeout(&self) -> Duration;
}
