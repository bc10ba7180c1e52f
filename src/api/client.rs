//! reqwest-backed [`Catalog`] for DummyJSON-style product services.
//!
//! ```text
//! GET /products?skip=&limit=
//! GET /products/category/{category}?skip=&limit=
//! GET /products/search?q=&skip=&limit=
//! GET /products/{id}
//! GET /products/categories
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::catalog::Catalog;
use super::error::ApiError;
use super::types::{WireCategory, WirePage, WireProduct};
use crate::core::product::{PageRequest, Product, ProductPage};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

pub struct CatalogClient {
    base_url: Url,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Creates a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::transport(format!("invalid base URL {base_url:?}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base_url, client })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::transport(format!("base URL {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            warn!("Catalog API error: {} for {}", status, url);
            return Err(ApiError::status(status));
        }

        Ok(response.json::<T>().await?)
    }

    async fn get_page(
        &self,
        url: Url,
        mut query: Vec<(&str, String)>,
        page: PageRequest,
    ) -> Result<ProductPage, ApiError> {
        query.push(("skip", page.skip.to_string()));
        query.push(("limit", page.limit.to_string()));
        let wire: WirePage = self.get_json(url, &query).await?;
        let page = wire.into_page();
        info!(
            "Fetched page skip={} limit={} ({} products, total {})",
            page.skip,
            page.limit,
            page.products.len(),
            page.total
        );
        Ok(page)
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn list_products(
        &self,
        page: PageRequest,
        category: Option<&str>,
    ) -> Result<ProductPage, ApiError> {
        let url = match category {
            Some(category) => self.endpoint(&["products", "category", category])?,
            None => self.endpoint(&["products"])?,
        };
        self.get_page(url, Vec::new(), page).await
    }

    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<ProductPage, ApiError> {
        let url = self.endpoint(&["products", "search"])?;
        self.get_page(url, vec![("q", query.to_string())], page)
            .await
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", &id.to_string()])?;
        let wire: WireProduct = self.get_json(url, &[]).await?;
        wire.into_product()
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["products", "categories"])?;
        let wire: Vec<WireCategory> = self.get_json(url, &[]).await?;
        Ok(wire.into_iter().map(WireCategory::into_slug).collect())
    }
}
