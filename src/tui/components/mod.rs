//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive everything they draw as struct fields:
//! - `TitleBar`: App name, screen title, status message
//! - `FilterBar`: Category chips and the active sort
//! - `ErrorView`: Failure message with a retry hint
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it
//! each frame:
//! - `ProductList` / `ProductListState`: Selection, near-end detection
//! - `ProductDetail` / `DetailViewState`: Scroll offset, image switching
//! - `Prompt` / `PromptState`: Search and link text entry
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs
//! ├── filter_bar.rs
//! ├── product_list.rs
//! ├── product_detail.rs
//! ├── error_view.rs
//! └── prompt.rs
//! ```

pub mod error_view;
pub mod filter_bar;
pub mod product_detail;
pub mod product_list;
pub mod prompt;
mod title_bar;

pub use error_view::ErrorView;
pub use filter_bar::FilterBar;
pub use product_detail::{DetailViewEvent, DetailViewState, ProductDetail};
pub use product_list::{Footer, ProductList, ProductListEvent, ProductListState};
pub use prompt::{Prompt, PromptEvent, PromptKind, PromptState};
pub use title_bar::TitleBar;
