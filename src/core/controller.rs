//! # Controllers
//!
//! Async drivers that pair a reducer with the services its effects need.
//!
//! ```text
//!   controller.select_category(..)
//!       └── update(state, action) ──▶ Effect
//!                                       └── run_list_effect(catalog, effect)
//!                                             └── ListAction::PageLoaded ──▶ update(..)
//! ```
//!
//! The effect runners are free functions so the terminal UI can run the same
//! fetches on spawned tasks and feed the resulting actions back itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::api::Catalog;
use crate::core::detail::{self, DetailAction, DetailEffect, DetailState};
use crate::core::list::{self, Effect, FetchTicket, ListAction, ListFilter, ListState};
use crate::core::reminders::ReminderService;
use crate::core::sort::SortOption;

/// Fetches the page a ticket describes.
pub async fn fetch_page(catalog: &dyn Catalog, ticket: FetchTicket) -> ListAction {
    let request = ticket.request();
    let result = match &ticket.filter {
        ListFilter::All => catalog.list_products(request, None).await,
        ListFilter::Category(category) => catalog.list_products(request, Some(category)).await,
        ListFilter::Search(query) => catalog.search_products(query, request).await,
    };
    ListAction::PageLoaded { ticket, result }
}

/// Runs a list effect and returns the actions its results produce.
pub async fn run_list_effect(catalog: &dyn Catalog, effect: Effect) -> Vec<ListAction> {
    match effect {
        Effect::None => Vec::new(),
        Effect::Fetch(ticket) => vec![fetch_page(catalog, ticket).await],
        Effect::Initialize(ticket) => {
            let (categories, page) =
                futures::join!(catalog.list_categories(), fetch_page(catalog, ticket));
            vec![ListAction::CategoriesLoaded(categories), page]
        }
    }
}

/// Runs a detail effect and returns the action its result produces.
pub async fn run_detail_effect(
    catalog: &dyn Catalog,
    reminders: &dyn ReminderService,
    effect: DetailEffect,
) -> Option<DetailAction> {
    match effect {
        DetailEffect::None => None,
        DetailEffect::FetchProduct(product_id) => Some(DetailAction::Loaded {
            product_id,
            result: catalog.get_product(product_id).await,
        }),
        DetailEffect::AddReminder {
            product_title,
            when,
        } => Some(DetailAction::ReminderFinished(
            reminders.add_purchase_reminder(&product_title, when).await,
        )),
    }
}

/// Drives a [`ListState`] to completion for each operation.
pub struct ListController {
    pub state: ListState,
    catalog: Arc<dyn Catalog>,
}

impl ListController {
    pub fn new(state: ListState, catalog: Arc<dyn Catalog>) -> Self {
        Self { state, catalog }
    }

    /// Applies `action` and every follow-up action until nothing is left to run.
    pub async fn dispatch(&mut self, action: ListAction) {
        let effect = list::update(&mut self.state, action);
        for follow_up in run_list_effect(self.catalog.as_ref(), effect).await {
            list::update(&mut self.state, follow_up);
        }
    }

    pub async fn initialize(&mut self) {
        self.dispatch(ListAction::Initialize).await;
    }

    pub async fn refresh(&mut self) {
        self.dispatch(ListAction::Refresh).await;
    }

    pub async fn select_category(&mut self, category: Option<String>) {
        self.dispatch(ListAction::SelectCategory(category)).await;
    }

    pub async fn search(&mut self, query: Option<String>) {
        self.dispatch(ListAction::Search(query)).await;
    }

    pub async fn change_sort(&mut self, sort: SortOption) {
        self.dispatch(ListAction::ChangeSort(sort)).await;
    }

    pub async fn load_more(&mut self) {
        self.dispatch(ListAction::LoadMore).await;
    }

    pub async fn retry(&mut self) {
        self.dispatch(ListAction::Retry).await;
    }
}

/// Drives a [`DetailState`] for one product screen.
pub struct DetailController {
    pub state: DetailState,
    catalog: Arc<dyn Catalog>,
    reminders: Arc<dyn ReminderService>,
}

impl DetailController {
    pub fn new(
        product_id: u64,
        catalog: Arc<dyn Catalog>,
        reminders: Arc<dyn ReminderService>,
    ) -> Self {
        Self {
            state: DetailState::new(product_id),
            catalog,
            reminders,
        }
    }

    pub async fn dispatch(&mut self, action: DetailAction) {
        let effect = detail::update(&mut self.state, action);
        if let Some(follow_up) =
            run_detail_effect(self.catalog.as_ref(), self.reminders.as_ref(), effect).await
        {
            detail::update(&mut self.state, follow_up);
        }
    }

    pub async fn load(&mut self) {
        let id = self.state.product_id;
        self.dispatch(DetailAction::Load(id)).await;
    }

    pub async fn retry(&mut self) {
        self.dispatch(DetailAction::Retry).await;
    }

    pub async fn add_reminder(&mut self, when: Option<DateTime<Utc>>) {
        self.dispatch(DetailAction::RequestReminder(when)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::core::detail::{Notice, REMINDER_ADDED};
    use crate::core::list::Phase;
    use crate::core::product::{PageRequest, sample};
    use crate::core::reminders::ReminderError;
    use crate::test_support::{CatalogCall, ScriptedCatalog, StubReminders, sample_page};

    fn list_controller(catalog: &Arc<ScriptedCatalog>) -> ListController {
        ListController::new(ListState::new(20), catalog.clone())
    }

    #[tokio::test]
    async fn test_initialize_fetches_categories_and_first_page() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_page(Ok(sample_page(1, 20, 20)));
        let mut controller = list_controller(&catalog);

        controller.initialize().await;

        assert_eq!(controller.state.phase(), Phase::Loaded);
        assert_eq!(controller.state.products.len(), 20);
        assert!(controller.state.has_more);
        assert_eq!(controller.state.categories, vec!["smartphones", "laptops"]);
        assert!(catalog.calls().contains(&CatalogCall::List {
            page: PageRequest { skip: 0, limit: 20 },
            category: None,
        }));
    }

    #[tokio::test]
    async fn test_short_page_stops_further_fetches() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_page(Ok(sample_page(1, 7, 20)));
        let mut controller = list_controller(&catalog);

        controller.initialize().await;
        controller.load_more().await;
        controller.load_more().await;

        assert_eq!(catalog.page_fetches(), 1);
        assert_eq!(controller.state.products.len(), 7);
    }

    #[tokio::test]
    async fn test_load_more_accumulates_pages() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 20, 20)))
            .push_page(Ok(sample_page(21, 20, 20)))
            .push_page(Ok(sample_page(41, 5, 20)));
        let mut controller = list_controller(&catalog);

        controller.initialize().await;
        controller.load_more().await;
        controller.load_more().await;
        controller.load_more().await;

        assert_eq!(controller.state.products.len(), 45);
        assert_eq!(controller.state.current_page, 2);
        assert!(!controller.state.has_more);
        assert_eq!(catalog.page_fetches(), 3);
        assert!(catalog.calls().contains(&CatalogCall::List {
            page: PageRequest { skip: 40, limit: 20 },
            category: None,
        }));
    }

    #[tokio::test]
    async fn test_category_and_search_requests() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 3, 20)))
            .push_page(Ok(sample_page(10, 2, 20)));
        let mut controller = list_controller(&catalog);

        controller.select_category(Some("laptops".to_string())).await;
        controller.search(Some("phone".to_string())).await;

        assert_eq!(
            catalog.calls(),
            vec![
                CatalogCall::List {
                    page: PageRequest { skip: 0, limit: 20 },
                    category: Some("laptops".to_string()),
                },
                CatalogCall::Search {
                    query: "phone".to_string(),
                    page: PageRequest { skip: 0, limit: 20 },
                },
            ]
        );
        assert_eq!(controller.state.products.len(), 2);
    }

    #[tokio::test]
    async fn test_change_sort_makes_no_request() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_page(Ok(sample_page(1, 3, 20)));
        let mut controller = list_controller(&catalog);
        controller.initialize().await;
        let before = catalog.calls().len();

        controller.change_sort(SortOption::PriceDesc).await;

        assert_eq!(catalog.calls().len(), before);
        let rendered: Vec<u64> = controller
            .state
            .rendered_products()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(rendered, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_retry_reissues_failed_fetch() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Err(ApiError::status(500)))
            .push_page(Ok(sample_page(1, 4, 20)));
        let mut controller = list_controller(&catalog);

        controller.select_category(Some("tops".to_string())).await;
        assert!(controller.state.shows_error_view());

        controller.retry().await;
        assert!(!controller.state.shows_error_view());
        assert_eq!(controller.state.products.len(), 4);

        let calls = catalog.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn test_refresh_replaces_products() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 20, 20)))
            .push_page(Ok(sample_page(21, 20, 20)))
            .push_page(Ok(sample_page(100, 2, 20)));
        let mut controller = list_controller(&catalog);
        controller.initialize().await;
        controller.load_more().await;

        controller.refresh().await;

        let ids: Vec<u64> = controller.state.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![100, 101]);
        assert_eq!(controller.state.current_page, 0);
        assert!(!controller.state.refreshing);
    }

    #[tokio::test]
    async fn test_detail_load_and_reminder() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_product(Ok(sample(9, 120.0, Some(4.5))));
        let reminders = Arc::new(StubReminders::succeeding(true));
        let mut controller = DetailController::new(9, catalog.clone(), reminders.clone());

        controller.load().await;
        assert_eq!(controller.state.product.as_ref().map(|p| p.id), Some(9));

        controller.add_reminder(None).await;
        assert_eq!(
            controller.state.notice,
            Some(Notice::Success(REMINDER_ADDED.to_string()))
        );
        assert_eq!(reminders.requests(), vec![("Product 9".to_string(), None)]);
    }

    #[tokio::test]
    async fn test_detail_not_found_then_retry() {
        let catalog = Arc::new(ScriptedCatalog::new());
        let reminders = Arc::new(StubReminders::succeeding(true));
        let mut controller = DetailController::new(404, catalog.clone(), reminders);

        controller.load().await;
        assert!(controller.state.shows_error_view());
        assert!(controller.state.error.as_ref().is_some_and(ApiError::is_not_found));

        catalog.push_product(Ok(sample(404, 1.0, None)));
        controller.retry().await;
        assert!(controller.state.product.is_some());
        assert_eq!(
            catalog.calls(),
            vec![CatalogCall::Get(404), CatalogCall::Get(404)]
        );
    }

    #[tokio::test]
    async fn test_detail_reminder_failure_notice() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_product(Ok(sample(2, 5.0, None)));
        let reminders = Arc::new(StubReminders::failing(ReminderError::Calendar(
            "disk full".to_string(),
        )));
        let mut controller = DetailController::new(2, catalog, reminders);

        controller.load().await;
        controller.add_reminder(None).await;
        assert!(matches!(controller.state.notice, Some(Notice::Failure(_))));
    }
}
