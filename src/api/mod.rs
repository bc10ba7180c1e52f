pub mod catalog;
pub mod client;
pub mod error;
pub mod types;

pub use catalog::Catalog;
pub use client::{CatalogClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiErrorKind};
