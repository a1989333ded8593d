//! Keyword rows in a hosted PostgREST table

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use landwatch_config::StoreConfig;
use landwatch_core::{CoreResult, KeywordStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct NewRow<'a> {
    user_id: &'a str,
    keyword: &'a str,
}

#[derive(Debug, Deserialize)]
struct KeywordRow {
    keyword: String,
}

/// `user_keywords`-style table with `user_id` and `keyword` columns
#[derive(Debug, Clone)]
pub struct RestKeywordStore {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RestKeywordStore {
    pub fn new(config: &StoreConfig) -> ClientResult<Self> {
        Ok(Self {
            client: crate::build_http_client(None)?,
            table_url: format!("{}/{}", config.url.trim_end_matches('/'), config.table),
            api_key: config.api_key.clone(),
        })
    }

    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.table_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn check(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
            })
        }
    }

    async fn select(&self, user_id: &str) -> ClientResult<Vec<String>> {
        let response = self
            .request(reqwest::Method::GET)
            .query(&[("select", "keyword".to_string()), ("user_id", format!("eq.{}", user_id))])
            .send()
            .await?;
        let body = Self::check(response)?.text().await?;
        let rows: Vec<KeywordRow> = serde_json::from_str(&body).map_err(|e| ClientError::Decode {
            message: e.to_string(),
        })?;
        Ok(rows.into_iter().map(|row| row.keyword).collect())
    }

    async fn insert_row(&self, user_id: &str, keyword: &str) -> ClientResult<()> {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", "return=minimal")
            .json(&NewRow { user_id, keyword })
            .send()
            .await?;
        Self::check(response).map(|_| ())
    }

    async fn delete_rows(&self, user_id: &str, keyword: &str) -> ClientResult<()> {
        let response = self
            .request(reqwest::Method::DELETE)
            .query(&[("user_id", format!("eq.{}", user_id)), ("keyword", format!("eq.{}", keyword))])
            .send()
            .await?;
        Self::check(response).map(|_| ())
    }
}

#[async_trait]
impl KeywordStore for RestKeywordStore {
    async fn list(&self, user_id: &str) -> CoreResult<Vec<String>> {
        self.select(user_id).await.map_err(ClientError::into_store)
    }

    async fn insert(&self, user_id: &str, keyword: &str) -> CoreResult<()> {
        self.insert_row(user_id, keyword).await.map_err(ClientError::into_store)
    }

    async fn delete(&self, user_id: &str, keyword: &str) -> CoreResult<()> {
        self.delete_rows(user_id, keyword).await.map_err(ClientError::into_store)
    }
}
