//! Wire types for the product catalog service and their mapping into
//! `core::product`.
//!
//! Every field is optional on the wire. Mapping decides what is required:
//! a product without `id`, `title` or `price` cannot be shown and is an error;
//! anything else that is missing stays `None`.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::error::ApiError;
use crate::core::product::{Product, ProductPage};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(alias = "discount_percentage")]
    pub discount_percentage: Option<f64>,
    pub rating: Option<f64>,
    pub stock: Option<i64>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Option<Vec<String>>,
}

impl WireProduct {
    pub fn into_product(self) -> Result<Product, ApiError> {
        let id = self
            .id
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::parse("product is missing an id"))?;
        let title = self
            .title
            .ok_or_else(|| ApiError::parse(format!("product {id} is missing a title")))?;
        let price = self
            .price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| ApiError::parse(format!("product {id} has no valid price")))?;

        Ok(Product {
            id,
            title,
            price,
            description: self.description,
            discount_percentage: self.discount_percentage.map(|d| d.clamp(0.0, 100.0)),
            rating: self.rating.map(|r| r.clamp(0.0, 5.0)),
            stock: self.stock.map(|s| s.clamp(0, u32::MAX as i64) as u32),
            brand: self.brand,
            category: self.category,
            thumbnail: self.thumbnail,
            images: self.images.unwrap_or_default(),
        })
    }
}

/// Body of every list endpoint: `{products, total, skip, limit}`.
///
/// Products stay raw JSON until `into_page` so one malformed record cannot
/// fail the whole page.
#[derive(Deserialize, Debug)]
pub struct WirePage {
    #[serde(default)]
    pub products: Vec<Value>,
    pub total: Option<u32>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl WirePage {
    /// Maps the page, skipping products that cannot be decoded or mapped.
    pub fn into_page(self) -> ProductPage {
        let received = self.products.len() as u32;
        let products: Vec<Product> = self
            .products
            .into_iter()
            .filter_map(|raw| {
                let mapped = serde_json::from_value::<WireProduct>(raw)
                    .map_err(|e| ApiError::parse(format!("malformed product: {e}")))
                    .and_then(WireProduct::into_product);
                match mapped {
                    Ok(product) => Some(product),
                    Err(e) => {
                        warn!("Skipping unmappable product: {}", e);
                        None
                    }
                }
            })
            .collect();

        ProductPage {
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(received),
            total: self.total.unwrap_or(0),
            fetched: received,
            products,
        }
    }
}

/// The categories endpoint returns either plain slugs or `{slug, name, url}` objects.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum WireCategory {
    Slug(String),
    Detailed { slug: String },
}

impl WireCategory {
    pub fn into_slug(self) -> String {
        match self {
            WireCategory::Slug(slug) => slug,
            WireCategory::Detailed { slug, .. } => slug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_maps_camel_case_fields() {
        let json = r#"{
            "id": 1,
            "title": "iPhone 9",
            "description": "An apple mobile",
            "price": 549,
            "discountPercentage": 12.96,
            "rating": 4.69,
            "stock": 94,
            "brand": "Apple",
            "category": "smartphones",
            "thumbnail": "https://cdn.dummyjson.com/1/thumbnail.jpg",
            "images": ["https://cdn.dummyjson.com/1/1.jpg", "https://cdn.dummyjson.com/1/2.jpg"]
        }"#;
        let wire: WireProduct = serde_json::from_str(json).unwrap();
        let product = wire.into_product().unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.price, 549.0);
        assert_eq!(product.discount_percentage, Some(12.96));
        assert_eq!(product.stock, Some(94));
        assert_eq!(product.images.len(), 2);
    }

    #[test]
    fn test_missing_optional_fields_stay_none() {
        let json = r#"{"id": 2, "title": "Plain", "price": 3.5}"#;
        let product = serde_json::from_str::<WireProduct>(json)
            .unwrap()
            .into_product()
            .unwrap();
        assert_eq!(product.brand, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.stock, None);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_missing_identity_fails() {
        let no_id: WireProduct = serde_json::from_str(r#"{"title": "x", "price": 1}"#).unwrap();
        assert!(no_id.into_product().is_err());

        let no_price: WireProduct = serde_json::from_str(r#"{"id": 3, "title": "x"}"#).unwrap();
        let err = no_price.into_product().unwrap_err();
        assert!(err.to_string().contains("product 3"));
    }

    #[test]
    fn test_page_skips_bad_products_but_keeps_limit() {
        let json = r#"{
            "products": [
                {"id": 1, "title": "a", "price": 1},
                {"title": "no id", "price": 2},
                {"id": 3, "title": "c", "price": 3}
            ],
            "total": 100,
            "skip": 0,
            "limit": 3
        }"#;
        let page = serde_json::from_str::<WirePage>(json).unwrap().into_page();
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.fetched, 3);
        assert_eq!(page.limit, 3);
        assert_eq!(page.total, 100);
    }

    #[test]
    fn test_page_skips_products_with_wrong_field_types() {
        let json = r#"{
            "products": [
                {"id": 1, "title": "a", "price": 1, "rating": 4.5},
                {"id": 2, "title": "b", "price": 2, "rating": "4.5"},
                {"id": -3, "title": "c", "price": 3},
                {"id": 4, "title": "d", "price": 4, "stock": "plenty"},
                {"id": 5, "title": "e", "price": 5}
            ],
            "total": 5,
            "skip": 0,
            "limit": 5
        }"#;
        let page = serde_json::from_str::<WirePage>(json).unwrap().into_page();
        let ids: Vec<u64> = page.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 5]);
        // Dropped records still count towards has-more detection
        assert_eq!(page.fetched, 5);
    }

    #[test]
    fn test_categories_accept_both_shapes() {
        let plain: Vec<WireCategory> = serde_json::from_str(r#"["laptops", "tops"]"#).unwrap();
        let detailed: Vec<WireCategory> = serde_json::from_str(
            r#"[{"slug": "beauty", "name": "Beauty", "url": "https://dummyjson.com/products/category/beauty"}]"#,
        )
        .unwrap();
        let slugs: Vec<String> = plain
            .into_iter()
            .chain(detailed)
            .map(WireCategory::into_slug)
            .collect();
        assert_eq!(slugs, vec!["laptops", "tops", "beauty"]);
    }
}
