//! # Core Application Logic
//!
//! This module contains Shelf's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • list / detail state  │
//!                    │  • actions + update()   │
//!                    │  • sort, deep links     │
//!                    │                         │
//!                    │  Reducers do no I/O.    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ Controllers│      │    API     │
//!     │  Adapter   │      │  (async    │      │  (Catalog  │
//!     │ (ratatui)  │      │   drivers) │      │   trait)   │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`product`]: The normalized `Product` and paging types
//! - [`list`]: List screen state machine (pagination, filters, sort)
//! - [`detail`]: Detail screen state machine (product, images, reminders)
//! - [`controller`]: Async drivers that run reducer effects
//! - [`sort`]: Pure, stable product ordering
//! - [`deep_link`]: URL → navigation intent
//! - [`reminders`]: Calendar + notification reminder capability
//! - [`config`]: `~/.shelf/config.toml` loading and resolution

pub mod config;
pub mod controller;
pub mod deep_link;
pub mod detail;
pub mod list;
pub mod product;
pub mod reminders;
pub mod sort;
