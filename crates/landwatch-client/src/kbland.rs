//! Transaction API client

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use landwatch_config::UpstreamConfig;
use landwatch_core::{CoreResult, TransactionSource};
use serde_json::Value;

/// GETs the price-change ranking endpoint
#[derive(Debug, Clone)]
pub struct KbLandClient {
    client: reqwest::Client,
    url: String,
}

impl KbLandClient {
    pub fn new(config: &UpstreamConfig) -> ClientResult<Self> {
        Ok(Self {
            client: crate::build_http_client(config.timeout_secs)?,
            url: config.search_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn get(&self, query: &[(&'static str, String)]) -> ClientResult<Value> {
        let response = self.client.get(&self.url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Transaction API returned {}", status);
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl TransactionSource for KbLandClient {
    async fn fetch(&self, query: &[(&'static str, String)]) -> CoreResult<Value> {
        log::debug!("GET {} ({} params)", self.url, query.len());
        self.get(query).await.map_err(ClientError::into_upstream)
    }
}
