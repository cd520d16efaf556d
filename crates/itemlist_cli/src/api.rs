//! Remote access to the item list server.
//!
//! # Responsibility
//! - Define the `ItemsApi` seam the list session drives.
//! - Provide the reqwest-backed implementation against the `/api` routes.
//!
//! # Invariants
//! - No retries: each call maps to exactly one HTTP request.
//! - Order reads are global; `search` is forwarded but the server ignores it.

use async_trait::async_trait;
use itemlist_core::{ItemId, ItemPage};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Default base URL of a locally running server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3001/api";

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by item list API calls.
#[derive(Debug)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    Network(String),
    /// The server answered with a non-success status.
    Status { endpoint: &'static str, status: u16 },
    /// The response body was not the expected JSON shape.
    Decode(String),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(err) => write!(f, "network error: {err}"),
            Self::Status { endpoint, status } => {
                write!(f, "{endpoint} returned status {status}")
            }
            Self::Decode(err) => write!(f, "decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

/// Operations the client merge layer needs from the server.
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn get_items(&self, search: &str, offset: usize, limit: usize) -> ApiResult<ItemPage>;
    async fn get_order(&self, search: &str) -> ApiResult<Vec<ItemId>>;
    async fn set_order(&self, ids: &[ItemId], search: &str) -> ApiResult<()>;
    async fn get_selection(&self) -> ApiResult<Vec<ItemId>>;
    async fn set_selection(&self, ids: &[ItemId]) -> ApiResult<()>;
}

/// `ItemsApi` over HTTP.
#[derive(Clone)]
pub struct HttpItemsApi {
    client: Client,
    base_url: String,
}

impl HttpItemsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_ids<Q: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        query: &Q,
        ids: &[ItemId],
    ) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url(endpoint))
            .query(query)
            .json(ids)
            .send()
            .await?;
        check_status(endpoint, response.status())
    }
}

fn check_status(endpoint: &'static str, status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn get_items(&self, search: &str, offset: usize, limit: usize) -> ApiResult<ItemPage> {
        let endpoint = "/items";
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("search", search.to_string()),
            ])
            .send()
            .await?;
        check_status(endpoint, response.status())?;
        Ok(response.json::<ItemPage>().await?)
    }

    async fn get_order(&self, search: &str) -> ApiResult<Vec<ItemId>> {
        let endpoint = "/items/order";
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[("search", search)])
            .send()
            .await?;
        check_status(endpoint, response.status())?;
        Ok(response.json::<Vec<ItemId>>().await?)
    }

    async fn set_order(&self, ids: &[ItemId], search: &str) -> ApiResult<()> {
        self.post_ids("/items/order", &[("search", search)], ids)
            .await
    }

    async fn get_selection(&self) -> ApiResult<Vec<ItemId>> {
        let endpoint = "/items/selection";
        let response = self.client.get(self.url(endpoint)).send().await?;
        check_status(endpoint, response.status())?;
        Ok(response.json::<Vec<ItemId>>().await?)
    }

    async fn set_selection(&self, ids: &[ItemId]) -> ApiResult<()> {
        let empty: [(&str, &str); 0] = [];
        self.post_ids("/items/selection", &empty, ids).await
    }
}
