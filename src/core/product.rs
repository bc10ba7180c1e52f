//! # Product Model
//!
//! The normalized catalog shape the rest of Shelf works with. Wire formats
//! live in `api::types`; everything here is already mapped.
//!
//! Optional fields stay `None` when the upstream record leaves them out.
//! Display code decides how to present a gap, the model never invents a value.

use serde::{Deserialize, Serialize};

/// Stock at or below this count gets the "Only N left!" label.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    /// Percentage off the list price, 0–100.
    pub discount_percentage: Option<f64>,
    /// Average review score, 0.0–5.0.
    pub rating: Option<f64>,
    pub stock: Option<u32>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    pub images: Vec<String>,
}

impl Product {
    /// Discount as a positive percentage, or None when there is no discount.
    pub fn active_discount(&self) -> Option<f64> {
        self.discount_percentage.filter(|d| *d > 0.0 && *d < 100.0)
    }

    /// Price before the discount was applied.
    pub fn original_price(&self) -> Option<f64> {
        self.active_discount()
            .map(|discount| self.price / (1.0 - discount / 100.0))
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock.is_some_and(|s| s <= LOW_STOCK_THRESHOLD)
    }

    /// "In Stock" above the threshold, "Only N left!" at or below it.
    pub fn stock_label(&self) -> Option<String> {
        self.stock.map(|stock| {
            if stock > LOW_STOCK_THRESHOLD {
                "In Stock".to_string()
            } else {
                format!("Only {stock} left!")
            }
        })
    }

    /// Image at `index`, falling back to the thumbnail when out of range.
    pub fn image_at(&self, index: usize) -> Option<&str> {
        self.images
            .get(index)
            .map(String::as_str)
            .or(self.thumbnail.as_deref())
    }
}

/// One fetched batch of products plus its paging metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPage {
    pub skip: u32,
    pub limit: u32,
    /// Count reported by the server. Not used for end-of-list detection.
    pub total: u32,
    /// Records the server sent, including any dropped while mapping.
    pub fetched: u32,
    pub products: Vec<Product>,
}

impl ProductPage {
    pub fn new(skip: u32, limit: u32, total: u32, products: Vec<Product>) -> Self {
        Self {
            skip,
            limit,
            total,
            fetched: products.len() as u32,
            products,
        }
    }
}

/// Offset/limit pair for a paged request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Request for the zero-based `page` at the given page size.
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            skip: page.saturating_mul(page_size),
            limit: page_size,
        }
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Capitalizes the first character of a category slug for chip labels.
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample(id: u64, price: f64, rating: Option<f64>) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        price,
        description: Some(format!("Description for product {id}")),
        discount_percentage: None,
        rating,
        stock: Some(50),
        brand: Some("Acme".to_string()),
        category: Some("smartphones".to_string()),
        thumbnail: Some(format!("https://cdn.example/{id}/thumb.png")),
        images: vec![format!("https://cdn.example/{id}/1.png")],
    }
}
