use crate::domain::model::QueryResponse;
use crate::domain::ports::{ConfigProvider, PropertySource};
use crate::utils::error::{CacheError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// GROQ query selecting every property document.
pub const PROPERTY_QUERY: &str = r#"*[_type == "property"]"#;

/// Encodes `query` the way form values are encoded (spaces become `+`).
pub fn encode_query(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

/// Reads properties from a Sanity query endpoint.
///
/// `api_url` is the endpoint up to and including `?query=`; the encoded
/// query is appended to it as-is.
#[derive(Debug, Clone)]
pub struct SanityClient {
    client: Client,
    api_url: String,
}

impl SanityClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_url(), config.upstream_timeout())
    }

    pub fn query_url(&self) -> String {
        format!("{}{}", self.api_url, encode_query(PROPERTY_QUERY))
    }
}

#[async_trait]
impl PropertySource for SanityClient {
    async fn fetch(&self) -> Result<QueryResponse> {
        let url = self.query_url();
        tracing::debug!("Making query request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("Query API response status: {}", response.status());

        if response.status() != StatusCode::OK {
            return Err(CacheError::UpstreamStatusError {
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        let envelope = serde_json::from_slice::<QueryResponse>(&body)?;
        Ok(envelope)
    }

    fn source_name(&self) -> &str {
        "Sanity"
    }
}
