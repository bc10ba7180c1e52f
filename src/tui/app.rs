//! # Screen Host
//!
//! Owns the list and detail state machines for the terminal UI and runs
//! their effects on spawned tasks.
//!
//! ```text
//!   key press ──▶ App::dispatch_*() ──▶ update() ──▶ Effect
//!                                                     │ tokio::spawn
//!                                                     ▼
//!   App::receive() ◀── mpsc::Sender<Message> ◀── run_*_effect()
//! ```
//!
//! Every screen mount gets a fresh token. A result tagged with an older token
//! belongs to a screen that is gone and is dropped on arrival, so a slow
//! fetch can never write into a screen the user has already left.

use std::sync::{Arc, mpsc};

use log::{debug, info, warn};

use crate::api::Catalog;
use crate::core::controller::{run_detail_effect, run_list_effect};
use crate::core::deep_link::{DeepLinkResolver, Intent, Navigator};
use crate::core::detail::{self, DetailAction, DetailEffect, DetailState};
use crate::core::list::{self, Effect, ListAction, ListState};
use crate::core::product::category_label;
use crate::core::reminders::ReminderService;
use crate::core::sort::SortOption;

/// Results coming back from background tasks.
#[derive(Debug)]
pub enum Message {
    List { token: u64, action: ListAction },
    Detail { token: u64, action: DetailAction },
}

/// Shared services the screens call into.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn Catalog>,
    pub reminders: Arc<dyn ReminderService>,
}

/// How new list screens are set up.
#[derive(Debug, Clone)]
pub struct ListSettings {
    pub page_size: u32,
    pub default_sort: SortOption,
    pub fence_stale_results: bool,
    pub fallback_categories: Vec<String>,
}

pub struct App {
    pub list: ListState,
    pub detail: Option<DetailState>,
    pub status_message: String,
    list_token: u64,
    detail_token: u64,
    services: Services,
    settings: ListSettings,
    links: DeepLinkResolver,
    tx: mpsc::Sender<Message>,
}

impl App {
    pub fn new(
        services: Services,
        settings: ListSettings,
        links: DeepLinkResolver,
        tx: mpsc::Sender<Message>,
    ) -> Self {
        let list = Self::fresh_list(&settings, None);
        Self {
            list,
            detail: None,
            status_message: String::new(),
            list_token: 0,
            detail_token: 0,
            services,
            settings,
            links,
            tx,
        }
    }

    fn fresh_list(settings: &ListSettings, category: Option<String>) -> ListState {
        ListState::new(settings.page_size)
            .with_category(category)
            .with_sort(settings.default_sort)
            .with_fencing(settings.fence_stale_results)
            .with_fallback_categories(settings.fallback_categories.clone())
    }

    /// Mounts a new list screen and starts loading it.
    pub fn start(&mut self, category: Option<String>) {
        // Keep the user's sort across remounts
        let sort = if self.list_token == 0 {
            self.settings.default_sort
        } else {
            self.list.sort
        };
        self.list = Self::fresh_list(&self.settings, category).with_sort(sort);
        self.list_token += 1;
        info!(
            "Mounted list screen {} (category {:?})",
            self.list_token, self.list.selected_category
        );
        self.dispatch_list(ListAction::Initialize);
    }

    pub fn list_token(&self) -> u64 {
        self.list_token
    }

    pub fn detail_token(&self) -> u64 {
        self.detail_token
    }

    pub fn dispatch_list(&mut self, action: ListAction) {
        let effect = list::update(&mut self.list, action);
        self.spawn_list(effect);
    }

    pub fn dispatch_detail(&mut self, action: DetailAction) {
        let Some(state) = self.detail.as_mut() else {
            debug!("Detail action with no detail screen open: {:?}", action);
            return;
        };
        let effect = detail::update(state, action);
        self.spawn_detail(effect);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Applies a background result if its screen is still mounted.
    pub fn receive(&mut self, message: Message) {
        match message {
            Message::List { token, action } => {
                if token != self.list_token {
                    debug!("Dropping result for unmounted list screen {}", token);
                    return;
                }
                self.dispatch_list(action);
            }
            Message::Detail { token, action } => {
                if token != self.detail_token || self.detail.is_none() {
                    debug!("Dropping result for unmounted detail screen {}", token);
                    return;
                }
                self.dispatch_detail(action);
            }
        }
    }

    fn spawn_list(&self, effect: Effect) {
        if effect == Effect::None {
            return;
        }
        let catalog = self.services.catalog.clone();
        let tx = self.tx.clone();
        let token = self.list_token;
        tokio::spawn(async move {
            for action in run_list_effect(catalog.as_ref(), effect).await {
                if tx.send(Message::List { token, action }).is_err() {
                    warn!("Failed to deliver list result: receiver dropped");
                    return;
                }
            }
        });
    }

    fn spawn_detail(&self, effect: DetailEffect) {
        if effect == DetailEffect::None {
            return;
        }
        let services = self.services.clone();
        let tx = self.tx.clone();
        let token = self.detail_token;
        tokio::spawn(async move {
            let action = run_detail_effect(
                services.catalog.as_ref(),
                services.reminders.as_ref(),
                effect,
            )
            .await;
            if let Some(action) = action
                && tx.send(Message::Detail { token, action }).is_err()
            {
                warn!("Failed to deliver detail result: receiver dropped");
            }
        });
    }

    /// Resolves a link typed or passed by the user.
    pub fn open_link(&mut self, url: &str) -> bool {
        let links = self.links.clone();
        let handled = links.handle(url, self);
        if handled {
            self.status_message.clear();
        } else {
            warn!("Unrecognized link: {}", url);
            self.status_message = format!("Link not recognized: {url}");
        }
        handled
    }

    /// The link that reopens what is on screen.
    pub fn current_link(&self) -> Option<String> {
        let intent = match &self.detail {
            Some(detail) => Intent::ProductDetail(detail.product_id),
            None => Intent::ProductList(self.list.selected_category.clone()?),
        };
        Some(self.links.link_for(&intent))
    }

    pub fn screen_title(&self) -> String {
        if let Some(detail) = &self.detail {
            return match &detail.product {
                Some(product) => product.title.clone(),
                None => format!("Product #{}", detail.product_id),
            };
        }
        if let Some(query) = &self.list.search_query {
            format!("Search: {query}")
        } else if let Some(category) = &self.list.selected_category {
            category_label(category)
        } else {
            "All Products".to_string()
        }
    }

    /// Whether anything on screen is waiting on the network.
    pub fn is_busy(&self) -> bool {
        self.list.loading.is_some()
            || self.list.refreshing
            || self
                .detail
                .as_ref()
                .is_some_and(|d| d.loading || d.reminder_pending)
    }
}

impl Navigator for App {
    fn open_product_list(&mut self, category: Option<&str>) {
        self.detail = None;
        self.start(category.map(str::to_string));
    }

    fn open_product_detail(&mut self, product_id: u64) {
        self.detail_token += 1;
        self.detail = Some(DetailState::new(product_id));
        info!("Mounted detail screen {} for product {}", self.detail_token, product_id);
        self.dispatch_detail(DetailAction::Load(product_id));
    }
}
