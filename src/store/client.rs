use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::StoreConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid store configuration: {message}")]
    Configuration { message: String },
}

/// Client for the hosted store's REST data API.
///
/// One instance is constructed at process start and shared by handle;
/// the underlying `reqwest::Client` pools connections internally. Every
/// request carries the access key and an explicit timeout so a stalled
/// store cannot block a request indefinitely.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();

        let mut api_key =
            HeaderValue::from_str(&config.store_key).map_err(|_| StoreError::Configuration {
                message: "store key contains invalid header characters".to_string(),
            })?;
        api_key.set_sensitive(true);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.store_key)).map_err(
            |_| StoreError::Configuration {
                message: "store key contains invalid header characters".to_string(),
            },
        )?;
        bearer.set_sensitive(true);

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        let base_url = format!("{}/rest/v1", config.store_url.trim_end_matches('/'));

        Ok(Self { http, base_url })
    }

    /// Start a query scoped to one table.
    pub fn table(&self, name: &str) -> Table<'_> {
        Table {
            client: self,
            name: name.to_string(),
            filters: Vec::new(),
        }
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<Value>, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        Ok(response.json().await?)
    }
}

/// Builder for one request against a table, PostgREST filter syntax.
///
/// Mutations ask the store to return the affected rows
/// (`Prefer: return=representation`) so callers can distinguish
/// "matched and updated" from "no such row".
pub struct Table<'a> {
    client: &'a StoreClient,
    name: String,
    filters: Vec<(String, String)>,
}

impl Table<'_> {
    /// Add an equality filter on a column.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    fn url(&self) -> String {
        format!("{}/{}", self.client.base_url, self.name)
    }

    pub async fn select(self) -> Result<Vec<Value>, StoreError> {
        debug!(table = %self.name, "store select");
        let request = self
            .client
            .http
            .get(self.url())
            .query(&self.filters)
            .query(&[("select", "*")]);
        self.client.execute(request).await
    }

    pub async fn insert<T: Serialize + ?Sized>(self, row: &T) -> Result<Vec<Value>, StoreError> {
        debug!(table = %self.name, "store insert");
        let request = self
            .client
            .http
            .post(self.url())
            .header("Prefer", "return=representation")
            .json(row);
        self.client.execute(request).await
    }

    pub async fn update<T: Serialize + ?Sized>(self, patch: &T) -> Result<Vec<Value>, StoreError> {
        debug!(table = %self.name, "store update");
        let request = self
            .client
            .http
            .patch(self.url())
            .header("Prefer", "return=representation")
            .query(&self.filters)
            .json(patch);
        self.client.execute(request).await
    }

    pub async fn delete(self) -> Result<Vec<Value>, StoreError> {
        debug!(table = %self.name, "store delete");
        let request = self
            .client
            .http
            .delete(self.url())
            .header("Prefer", "return=representation")
            .query(&self.filters);
        self.client.execute(request).await
    }
}
