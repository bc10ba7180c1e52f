//! # Sort Engine
//!
//! Orders the accumulated product list for display. Pure and recomputed on
//! every render; the list controller never stores a sorted copy.
//!
//! Sorting is stable. Pages are appended in fetch order, so products with the
//! same price or rating must keep that order across re-sorts.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::product::Product;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOption {
    #[default]
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
    #[serde(rename = "rating-asc")]
    RatingAsc,
    #[serde(rename = "rating-desc")]
    RatingDesc,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::PriceAsc,
        SortOption::PriceDesc,
        SortOption::RatingAsc,
        SortOption::RatingDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::RatingAsc => "rating-asc",
            SortOption::RatingDesc => "rating-desc",
        }
    }

    /// Parses a wire-style key. Unknown keys yield None.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.as_str() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::RatingAsc => "Rating: Low to High",
            SortOption::RatingDesc => "Rating: High to Low",
        }
    }

    /// Cycles to the next option (wraps around).
    pub fn next(self) -> SortOption {
        match self {
            SortOption::PriceAsc => SortOption::PriceDesc,
            SortOption::PriceDesc => SortOption::RatingAsc,
            SortOption::RatingAsc => SortOption::RatingDesc,
            SortOption::RatingDesc => SortOption::PriceAsc,
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A missing rating ranks below every present rating.
fn compare_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Returns a new, stably sorted copy of `products`.
pub fn sort_products(products: &[Product], sort: SortOption) -> Vec<Product> {
    let mut sorted = products.to_vec();
    match sort {
        SortOption::PriceAsc => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortOption::PriceDesc => sorted.sort_by(|a, b| b.price.total_cmp(&a.price)),
        SortOption::RatingAsc => sorted.sort_by(|a, b| compare_rating(a.rating, b.rating)),
        SortOption::RatingDesc => sorted.sort_by(|a, b| compare_rating(b.rating, a.rating)),
    }
    sorted
}

/// Sorts by a wire-style key. An unknown key returns the input order unchanged.
pub fn sort_by_key_name(products: &[Product], key: &str) -> Vec<Product> {
    match SortOption::from_key(key) {
        Some(option) => sort_products(products, option),
        None => products.to_vec(),
    }
}
