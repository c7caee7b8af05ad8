// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::product::{Product, ProductPage};
use crate::models::query::PageRequest;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog responded with HTTP {0}")]
    Status(u16),

    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of product pages and product details
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one page of the browse listing or of search results
    async fn fetch_page(&self, request: &PageRequest) -> CatalogResult<ProductPage>;

    /// Fetch a single product by id
    async fn fetch_product(&self, id: u64) -> CatalogResult<Product>;
}

/// Parse a catalog base URL, accepting a bare `host:port` as plain HTTP
pub fn normalize_base_url(raw: &str) -> CatalogResult<Url> {
    let base = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url =
        Url::parse(&base).map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", base, e)))?;
    if url.cannot_be_a_base() {
        return Err(CatalogError::InvalidUrl(base));
    }
    Ok(url)
}

/// `CatalogSource` backed by a dummyjson-style REST API
pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> CatalogResult<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL for a browse or search page request
    pub fn page_url(&self, request: &PageRequest) -> CatalogResult<Url> {
        let mut url = if request.is_search() {
            self.endpoint(&["products", "search"])?
        } else {
            self.endpoint(&["products"])?
        };

        {
            let mut query = url.query_pairs_mut();
            if request.is_search() {
                query.append_pair("q", &request.query);
            }
            query
                .append_pair("limit", &request.page_size.to_string())
                .append_pair("skip", &request.skip().to_string());
        }

        Ok(url)
    }

    /// URL for a single product
    pub fn product_url(&self, id: u64) -> CatalogResult<Url> {
        self.endpoint(&["products", &id.to_string()])
    }

    fn endpoint(&self, segments: &[&str]) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CatalogResult<T> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch_page(&self, request: &PageRequest) -> CatalogResult<ProductPage> {
        let url = self.page_url(request)?;
        self.get_json(url).await
    }

    async fn fetch_product(&self, id: u64) -> CatalogResult<Product> {
        let url = self.product_url(id)?;
        self.get_json(url).await
    }
}
