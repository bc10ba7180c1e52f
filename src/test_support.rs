//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{ApiError, Catalog};
use crate::core::product::{PageRequest, Product, ProductPage, sample};
use crate::core::reminders::{
    CalendarEvent, Notifier, ReminderAlert, ReminderError, ReminderReceipt, ReminderService,
};

/// One call made against [`ScriptedCatalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    List {
        page: PageRequest,
        category: Option<String>,
    },
    Search {
        query: String,
        page: PageRequest,
    },
    Get(u64),
    Categories,
}

/// A catalog that answers from queued responses and records every call.
///
/// Page requests with nothing queued fail with a transport error, so a test
/// notices an unexpected fetch.
#[derive(Default)]
pub struct ScriptedCatalog {
    pages: Mutex<VecDeque<Result<ProductPage, ApiError>>>,
    products: Mutex<VecDeque<Result<Product, ApiError>>>,
    categories: Mutex<Option<Result<Vec<String>, ApiError>>>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Result<ProductPage, ApiError>) -> &Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub fn push_product(&self, product: Result<Product, ApiError>) -> &Self {
        self.products.lock().unwrap().push_back(product);
        self
    }

    pub fn set_categories(&self, categories: Result<Vec<String>, ApiError>) -> &Self {
        *self.categories.lock().unwrap() = Some(categories);
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of page fetches (list or search) made so far.
    pub fn page_fetches(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, CatalogCall::List { .. } | CatalogCall::Search { .. }))
            .count()
    }

    fn next_page(&self) -> Result<ProductPage, ApiError> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::transport("no scripted page left")))
    }
}

#[async_trait]
impl Catalog for ScriptedCatalog {
    async fn list_products(
        &self,
        page: PageRequest,
        category: Option<&str>,
    ) -> Result<ProductPage, ApiError> {
        self.calls.lock().unwrap().push(CatalogCall::List {
            page,
            category: category.map(str::to_string),
        });
        self.next_page()
    }

    async fn search_products(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<ProductPage, ApiError> {
        self.calls.lock().unwrap().push(CatalogCall::Search {
            query: query.to_string(),
            page,
        });
        self.next_page()
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        self.calls.lock().unwrap().push(CatalogCall::Get(id));
        self.products
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::status(404)))
    }

    async fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        self.calls.lock().unwrap().push(CatalogCall::Categories);
        self.categories
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(vec!["smartphones".to_string(), "laptops".to_string()]))
    }
}

/// A page of `count` sample products starting at `first_id`.
pub fn sample_page(first_id: u64, count: u32, page_size: u32) -> ProductPage {
    let products: Vec<Product> = (first_id..first_id + count as u64)
        .map(|id| sample(id, id as f64 * 10.0, Some(4.0)))
        .collect();
    ProductPage::new(0, page_size, 100, products)
}

/// Remembers every alert it was asked to schedule.
#[derive(Default)]
pub struct RecordingNotifier {
    scheduled: Mutex<Vec<(ReminderAlert, DateTime<Utc>)>>,
}

impl RecordingNotifier {
    pub fn scheduled(&self) -> Vec<(ReminderAlert, DateTime<Utc>)> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn schedule(&self, alert: ReminderAlert, at: DateTime<Utc>) -> Result<(), ReminderError> {
        self.scheduled.lock().unwrap().push((alert, at));
        Ok(())
    }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn schedule(&self, _alert: ReminderAlert, _at: DateTime<Utc>) -> Result<(), ReminderError> {
        Err(ReminderError::Notification("notifications disabled".to_string()))
    }
}

/// A reminder service that returns a fixed outcome and records requests.
pub struct StubReminders {
    outcome: Result<bool, ReminderError>,
    requests: Mutex<Vec<(String, Option<DateTime<Utc>>)>>,
}

impl StubReminders {
    /// Succeeds; `notification_scheduled` mirrors `notified`.
    pub fn succeeding(notified: bool) -> Self {
        Self {
            outcome: Ok(notified),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: ReminderError) -> Self {
        Self {
            outcome: Err(err),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, Option<DateTime<Utc>>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReminderService for StubReminders {
    async fn add_purchase_reminder(
        &self,
        product_title: &str,
        when: Option<DateTime<Utc>>,
    ) -> Result<ReminderReceipt, ReminderError> {
        self.requests
            .lock()
            .unwrap()
            .push((product_title.to_string(), when));
        let notification_scheduled = self.outcome.clone()?;
        Ok(ReminderReceipt {
            event_id: "stub-event".to_string(),
            remind_at: when.unwrap_or_else(Utc::now),
            notification_scheduled,
        })
    }

    async fn upcoming_reminders(&self) -> Result<Vec<CalendarEvent>, ReminderError> {
        Ok(Vec::new())
    }

    async fn remove_reminder(&self, _event_id: &str) -> Result<(), ReminderError> {
        Ok(())
    }
}
