//! # Product List State Machine
//!
//! Pagination, filtering and sorting for the list screen.
//!
//! ```text
//!            Initialize / SelectCategory / Search / Retry
//!   Idle ──────────────────────────────────────────────▶ Loading(Reset)
//!                                                          │
//!            PageLoaded(Ok)                                │ PageLoaded(Err)
//!   Loaded ◀───────────────────────────────────────────────┴──────────────▶ Error
//!     │  ▲
//!     │  │ PageLoaded(Ok)            Refresh: Loading(Reset) with the
//!     ▼  │                           `refreshing` flag instead of `loading`
//!   Loading(Append) ◀── LoadMore
//! ```
//!
//! `update()` is the only thing that mutates [`ListState`]. It never performs
//! I/O: when a fetch is needed it hands back an [`Effect`] carrying a
//! [`FetchTicket`], and the result comes back later as
//! [`ListAction::PageLoaded`] with the same ticket.
//!
//! ## Overlapping requests
//!
//! Nothing stops two reset fetches from being in flight at once (fast
//! category switching, repeated refresh). By default results are applied in
//! completion order, so a slow older request can overwrite a newer one.
//! With `fence_stale_results` set, a completion older than the latest reset
//! is dropped instead.

use log::{debug, info, warn};

use crate::api::ApiError;
use crate::core::product::{PageRequest, Product, ProductPage};
use crate::core::sort::{SortOption, sort_products};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Used when the category vocabulary cannot be fetched.
pub const FALLBACK_CATEGORIES: &[&str] = &[
    "smartphones",
    "laptops",
    "fragrances",
    "skincare",
    "groceries",
    "home-decoration",
    "furniture",
    "tops",
    "womens-dresses",
    "womens-shoes",
    "mens-shirts",
    "mens-shoes",
    "mens-watches",
    "womens-watches",
    "womens-bags",
    "womens-jewellery",
    "sunglasses",
    "automotive",
    "motorcycle",
    "lighting",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Replaces the accumulated products.
    Reset,
    /// Appends the next page.
    Append,
}

/// What a fetch is filtered by. Category and search never combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Category(String),
    Search(String),
}

/// Identifies one issued fetch so its completion can be matched up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub page: u32,
    pub page_size: u32,
    pub mode: FetchMode,
    pub filter: ListFilter,
}

impl FetchTicket {
    pub fn request(&self) -> PageRequest {
        PageRequest::page(self.page, self.page_size)
    }
}

#[derive(Debug)]
pub enum ListAction {
    Initialize,
    Refresh,
    /// `None` selects all categories.
    SelectCategory(Option<String>),
    /// `None` or blank clears the search.
    Search(Option<String>),
    ChangeSort(SortOption),
    LoadMore,
    Retry,
    CategoriesLoaded(Result<Vec<String>, ApiError>),
    PageLoaded {
        ticket: FetchTicket,
        result: Result<ProductPage, ApiError>,
    },
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch(FetchTicket),
    /// Fetch the category vocabulary alongside the first page.
    Initialize(FetchTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading(FetchMode),
    Loaded,
    Error,
}

#[derive(Debug, Clone)]
pub struct ListState {
    /// Accumulated products in fetch order. Sorting happens at render time.
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub search_query: Option<String>,
    pub sort: SortOption,
    pub current_page: u32,
    pub has_more: bool,
    /// Set while a spinner-visible fetch is in flight.
    pub loading: Option<FetchMode>,
    /// Set while a pull-to-refresh fetch is in flight.
    pub refreshing: bool,
    pub error: Option<ApiError>,
    pub page_size: u32,
    pub fence_stale_results: bool,
    pub fallback_categories: Vec<String>,
    initialized: bool,
    next_seq: u64,
    latest_reset_seq: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            selected_category: None,
            search_query: None,
            sort: SortOption::default(),
            current_page: 0,
            has_more: false,
            loading: None,
            refreshing: false,
            error: None,
            page_size: page_size.max(1),
            fence_stale_results: false,
            fallback_categories: FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            initialized: false,
            next_seq: 0,
            latest_reset_seq: 0,
        }
    }

    /// Starts the screen pre-filtered to `category` (deep links).
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.selected_category = category.filter(|c| !c.is_empty());
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_fencing(mut self, fence_stale_results: bool) -> Self {
        self.fence_stale_results = fence_stale_results;
        self
    }

    pub fn with_fallback_categories(mut self, categories: Vec<String>) -> Self {
        if !categories.is_empty() {
            self.fallback_categories = categories;
        }
        self
    }

    pub fn phase(&self) -> Phase {
        if let Some(mode) = self.loading {
            Phase::Loading(mode)
        } else if self.refreshing {
            Phase::Loading(FetchMode::Reset)
        } else if self.error.is_some() {
            Phase::Error
        } else if self.initialized {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    pub fn filter(&self) -> ListFilter {
        if let Some(query) = &self.search_query {
            ListFilter::Search(query.clone())
        } else if let Some(category) = &self.selected_category {
            ListFilter::Category(category.clone())
        } else {
            ListFilter::All
        }
    }

    /// Products in display order.
    pub fn rendered_products(&self) -> Vec<Product> {
        sort_products(&self.products, self.sort)
    }

    pub fn shows_full_screen_spinner(&self) -> bool {
        self.loading == Some(FetchMode::Reset)
    }

    pub fn shows_footer_spinner(&self) -> bool {
        self.loading == Some(FetchMode::Append)
    }

    /// A failed first page replaces the whole list with an error view.
    pub fn shows_error_view(&self) -> bool {
        self.error.is_some() && self.current_page == 0
    }

    /// A failed later page keeps the list and shows the error below it.
    pub fn footer_error(&self) -> Option<&ApiError> {
        self.error.as_ref().filter(|_| self.current_page > 0)
    }

    pub fn can_load_more(&self) -> bool {
        self.initialized
            && self.has_more
            && self.loading.is_none()
            && !self.refreshing
            && !self.shows_error_view()
    }

    fn issue(&mut self, mode: FetchMode, page: u32) -> FetchTicket {
        self.next_seq += 1;
        if mode == FetchMode::Reset {
            self.latest_reset_seq = self.next_seq;
        }
        FetchTicket {
            seq: self.next_seq,
            page,
            page_size: self.page_size,
            mode,
            filter: self.filter(),
        }
    }

    /// Marks a reset fetch as in flight. Visible products stay until it lands.
    fn begin_reset(&mut self, refresh: bool) -> FetchTicket {
        if refresh {
            self.refreshing = true;
        } else {
            self.loading = Some(FetchMode::Reset);
        }
        self.error = None;
        self.issue(FetchMode::Reset, 0)
    }

    fn apply_categories(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(categories) => {
                self.categories = categories.into_iter().filter(|c| !c.is_empty()).collect();
                debug!("Loaded {} categories", self.categories.len());
            }
            Err(e) => {
                warn!("Category fetch failed, using fallback list: {}", e);
                self.categories = self.fallback_categories.clone();
            }
        }
    }

    fn apply_page(&mut self, ticket: FetchTicket, result: Result<ProductPage, ApiError>) {
        if self.fence_stale_results && ticket.seq < self.latest_reset_seq {
            debug!(
                "Dropping stale page (seq {} < latest reset {})",
                ticket.seq, self.latest_reset_seq
            );
            return;
        }

        self.loading = None;
        self.refreshing = false;

        match result {
            Ok(page) => {
                let fetched = page.fetched;
                match ticket.mode {
                    FetchMode::Reset => self.products = page.products,
                    FetchMode::Append => self.products.extend(page.products),
                }
                self.current_page = ticket.page;
                self.has_more = fetched == ticket.page_size;
                self.error = None;
                info!(
                    "Page {} applied ({:?}, {} fetched), {} products total, has_more={}",
                    ticket.page,
                    ticket.mode,
                    fetched,
                    self.products.len(),
                    self.has_more
                );
            }
            Err(e) => {
                warn!("Page {} failed ({:?}): {}", ticket.page, ticket.mode, e);
                if ticket.mode == FetchMode::Reset {
                    self.current_page = 0;
                }
                self.error = Some(e);
            }
        }
    }
}

/// Applies `action` to `state` and returns the effect the caller must run.
pub fn update(state: &mut ListState, action: ListAction) -> Effect {
    match action {
        ListAction::Initialize => {
            state.initialized = true;
            Effect::Initialize(state.begin_reset(false))
        }
        ListAction::Refresh => Effect::Fetch(state.begin_reset(true)),
        ListAction::SelectCategory(category) => {
            state.selected_category = category.filter(|c| !c.is_empty());
            state.search_query = None;
            state.initialized = true;
            Effect::Fetch(state.begin_reset(false))
        }
        ListAction::Search(query) => {
            state.search_query = query
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty());
            state.selected_category = None;
            state.initialized = true;
            Effect::Fetch(state.begin_reset(false))
        }
        ListAction::ChangeSort(sort) => {
            state.sort = sort;
            Effect::None
        }
        ListAction::LoadMore => {
            if !state.can_load_more() {
                debug!(
                    "LoadMore ignored (loading={:?}, refreshing={}, has_more={})",
                    state.loading, state.refreshing, state.has_more
                );
                return Effect::None;
            }
            state.loading = Some(FetchMode::Append);
            let next_page = state.current_page + 1;
            Effect::Fetch(state.issue(FetchMode::Append, next_page))
        }
        ListAction::Retry => {
            state.initialized = true;
            Effect::Fetch(state.begin_reset(false))
        }
        ListAction::CategoriesLoaded(result) => {
            state.apply_categories(result);
            Effect::None
        }
        ListAction::PageLoaded { ticket, result } => {
            state.apply_page(ticket, result);
            Effect::None
        }
    }
}
