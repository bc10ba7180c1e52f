use async_trait::async_trait;

use super::error::ApiError;
use crate::core::product::{PageRequest, Product, ProductPage};

/// Read access to a remote product catalog.
///
/// Implementations normalize every failure into [`ApiError`] and never retry;
/// retrying is the caller's call.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches one page, restricted to `category` when given.
    async fn list_products(
        &self,
        page: PageRequest,
        category: Option<&str>,
    ) -> Result<ProductPage, ApiError>;

    /// Fetches one page of products matching a free-text query.
    async fn search_products(&self, query: &str, page: PageRequest)
    -> Result<ProductPage, ApiError>;

    async fn get_product(&self, id: u64) -> Result<Product, ApiError>;

    /// The category vocabulary, as slugs.
    async fn list_categories(&self) -> Result<Vec<String>, ApiError>;
}
