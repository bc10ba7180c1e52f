//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the screens,
//! and translates keyboard events into list and detail actions.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (a fetch or reminder in flight): draws every ~80ms so the
//!   spinners move.
//! - **Idle**: sleeps up to 500ms and only redraws on input, background
//!   results, or resize.
//!
//! ## Keys
//!
//! | Screen | Key | Does |
//! |--------|-----|------|
//! | list   | ↑/↓ PgUp/PgDn Home/End | move selection |
//! | list   | Enter | open product |
//! | list   | ←/→ | previous/next category |
//! | list   | s | cycle sort |
//! | list   | / | search (Esc clears an active search) |
//! | list   | R, F5 | refresh |
//! | list   | r | retry after an error |
//! | detail | ←/→ | previous/next image |
//! | detail | r | add purchase reminder (retry after an error) |
//! | detail | x | dismiss notice |
//! | detail | Esc | back to list |
//! | both   | g | open a deep link |
//! | both   | l | show the link for this screen |
//! | both   | q, Ctrl+C | quit |

mod app;
mod component;
mod components;
mod event;
mod ui;

pub use app::{App, ListSettings, Message, Services};

use log::{debug, info};
use std::io::stdout;
use std::sync::mpsc;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::core::config::ResolvedConfig;
use crate::core::deep_link::{DeepLinkResolver, Navigator};
use crate::core::detail::DetailAction;
use crate::core::list::ListAction;
use crate::core::reminders::ReminderAlert;
use crate::tui::component::EventHandler;
use crate::tui::components::filter_bar::cycle_category;
use crate::tui::components::{
    DetailViewEvent, DetailViewState, ProductListEvent, ProductListState, PromptEvent, PromptKind,
    PromptState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub product_list: ProductListState,
    pub detail_view: DetailViewState,
    /// Open prompt overlay (None = hidden)
    pub prompt: Option<PromptState>,
    pub spinner_frame: usize,
    // Screen tokens the view state was last reset for
    seen_list_token: u64,
    seen_detail_token: u64,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            product_list: ProductListState::new(),
            detail_view: DetailViewState::new(),
            prompt: None,
            spinner_frame: 0,
            seen_list_token: 0,
            seen_detail_token: 0,
        }
    }

    /// Resets per-screen view state when a new screen was mounted.
    pub fn sync(&mut self, app: &App) {
        if app.list_token() != self.seen_list_token {
            self.seen_list_token = app.list_token();
            self.product_list = ProductListState::new();
        }
        if app.detail_token() != self.seen_detail_token {
            self.seen_detail_token = app.detail_token();
            self.detail_view = DetailViewState::new();
        }
        self.product_list.sync(&app.list.rendered_products());
    }
}

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// How the first screen is chosen.
#[derive(Debug, Clone, Default)]
pub struct Launch {
    pub category: Option<String>,
    pub link: Option<String>,
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Routes one input event to the prompt, the detail screen or the list.
pub fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Flow {
    if event == TuiEvent::ForceQuit {
        return Flow::Quit;
    }
    if event == TuiEvent::Resize {
        return Flow::Continue;
    }

    // An open prompt takes all input
    if let Some(prompt) = tui.prompt.as_mut() {
        if let Some(prompt_event) = prompt.handle_event(&event) {
            tui.prompt = None;
            match prompt_event {
                PromptEvent::Submit(PromptKind::Search, query) => {
                    app.dispatch_list(ListAction::Search(Some(query)));
                    tui.product_list.reset();
                }
                PromptEvent::Submit(PromptKind::Link, url) => {
                    if !url.is_empty() {
                        app.open_link(&url);
                    }
                }
                PromptEvent::Cancel => {}
            }
        }
        return Flow::Continue;
    }

    match event {
        TuiEvent::InputChar('q') => return Flow::Quit,
        TuiEvent::InputChar('g') => {
            tui.prompt = Some(PromptState::new(PromptKind::Link, ""));
            return Flow::Continue;
        }
        TuiEvent::InputChar('l') => {
            app.status_message = match app.current_link() {
                Some(link) => format!("Link: {link}"),
                None => "No link for this screen".to_string(),
            };
            return Flow::Continue;
        }
        _ => {}
    }

    if app.detail.is_some() {
        handle_detail_event(app, tui, event);
    } else {
        handle_list_event(app, tui, event);
    }
    Flow::Continue
}

fn handle_detail_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) {
    let shows_error = app.detail.as_ref().is_some_and(|d| d.shows_error_view());
    match event {
        TuiEvent::Escape => {
            app.close_detail();
            app.status_message.clear();
        }
        TuiEvent::InputChar('r') if shows_error => app.dispatch_detail(DetailAction::Retry),
        TuiEvent::InputChar('r') => app.dispatch_detail(DetailAction::RequestReminder(None)),
        TuiEvent::InputChar('x') => app.dispatch_detail(DetailAction::DismissNotice),
        TuiEvent::Refresh | TuiEvent::InputChar('R') => app.dispatch_detail(DetailAction::Retry),
        other => match tui.detail_view.handle_event(&other) {
            Some(DetailViewEvent::NextImage) => app.dispatch_detail(DetailAction::NextImage),
            Some(DetailViewEvent::PreviousImage) => {
                app.dispatch_detail(DetailAction::PreviousImage)
            }
            None => {}
        },
    }
}

fn handle_list_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) {
    match event {
        TuiEvent::Escape => {
            if app.list.search_query.is_some() {
                app.dispatch_list(ListAction::Search(None));
                tui.product_list.reset();
            }
        }
        TuiEvent::InputChar('/') => {
            let current = app.list.search_query.clone().unwrap_or_default();
            tui.prompt = Some(PromptState::new(PromptKind::Search, current));
        }
        TuiEvent::InputChar('s') => {
            let next = app.list.sort.next();
            app.dispatch_list(ListAction::ChangeSort(next));
        }
        TuiEvent::InputChar('r') if app.list.shows_error_view() => {
            app.dispatch_list(ListAction::Retry);
        }
        TuiEvent::InputChar('R') | TuiEvent::Refresh => {
            app.dispatch_list(ListAction::Refresh);
        }
        TuiEvent::CursorLeft | TuiEvent::CursorRight => {
            let forward = event == TuiEvent::CursorRight;
            let next = cycle_category(
                &app.list.categories,
                app.list.selected_category.as_deref(),
                forward,
            );
            app.dispatch_list(ListAction::SelectCategory(next));
            tui.product_list.reset();
        }
        other => {
            tui.product_list.sync(&app.list.rendered_products());
            match tui.product_list.handle_event(&other) {
                Some(ProductListEvent::Open(id)) => {
                    app.open_product_detail(id);
                }
                Some(ProductListEvent::NearEnd) => app.dispatch_list(ListAction::LoadMore),
                None => {}
            }
        }
    }
}

fn show_alert(app: &mut App, alert: ReminderAlert) {
    info!("Reminder due: {}", alert.body);
    app.status_message = format!("{}: {}", alert.title, alert.body);
}

pub fn run(
    config: ResolvedConfig,
    services: Services,
    mut alerts: UnboundedReceiver<ReminderAlert>,
    launch: Launch,
) -> std::io::Result<()> {
    let settings = ListSettings {
        page_size: config.page_size,
        default_sort: config.default_sort,
        fence_stale_results: config.fence_stale_results,
        fallback_categories: config.fallback_categories.clone(),
    };

    // Channel for results from background tasks
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(
        services,
        settings,
        DeepLinkResolver::new(config.link_scheme.clone()),
        tx,
    );
    app.start(launch.category);
    if let Some(link) = &launch.link {
        app.open_link(link);
    }

    let mut tui = TuiState::new();
    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.is_busy();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.sync(&app);
            tui.spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Short poll while spinners run, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            tui.sync(&app);
            if handle_event(&mut app, &mut tui, event) == Flow::Quit {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        // Results from background fetches
        while let Ok(message) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", message);
            app.receive(message);
        }

        // Reminders that came due
        while let Ok(alert) = alerts.try_recv() {
            needs_redraw = true;
            show_alert(&mut app, alert);
        }
    }

    ratatui::restore();
    info!("Shelf shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::product::sample;
    use crate::core::sort::SortOption;
    use crate::test_support::{ScriptedCatalog, StubReminders, sample_page};

    fn setup(catalog: Arc<ScriptedCatalog>) -> (App, TuiState, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        let services = Services {
            catalog,
            reminders: Arc::new(StubReminders::succeeding(true)),
        };
        let settings = ListSettings {
            page_size: 20,
            default_sort: SortOption::PriceAsc,
            fence_stale_results: false,
            fallback_categories: vec!["books".to_string()],
        };
        let app = App::new(services, settings, DeepLinkResolver::new("productsapp"), tx);
        (app, TuiState::new(), rx)
    }

    async fn pump(app: &mut App, tui: &mut TuiState, rx: &mpsc::Receiver<Message>) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
            while let Ok(message) = rx.try_recv() {
                app.receive(message);
            }
        }
        tui.sync(app);
    }

    fn type_text(app: &mut App, tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            handle_event(app, tui, TuiEvent::InputChar(c));
        }
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, mut tui, _rx) = setup(Arc::new(ScriptedCatalog::new()));
        assert_eq!(handle_event(&mut app, &mut tui, TuiEvent::ForceQuit), Flow::Quit);
        assert_eq!(
            handle_event(&mut app, &mut tui, TuiEvent::InputChar('q')),
            Flow::Quit
        );
    }

    #[tokio::test]
    async fn test_q_in_prompt_is_text() {
        let (mut app, mut tui, _rx) = setup(Arc::new(ScriptedCatalog::new()));
        handle_event(&mut app, &mut tui, TuiEvent::InputChar('/'));
        assert_eq!(
            handle_event(&mut app, &mut tui, TuiEvent::InputChar('q')),
            Flow::Continue
        );
        assert_eq!(tui.prompt.as_ref().map(|p| p.buffer.as_str()), Some("q"));
    }

    #[tokio::test]
    async fn test_search_prompt_submits_query() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 20, 20)))
            .push_page(Ok(sample_page(200, 2, 20)));
        let (mut app, mut tui, rx) = setup(catalog);
        app.start(None);
        pump(&mut app, &mut tui, &rx).await;

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('/'));
        type_text(&mut app, &mut tui, "phone");
        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        pump(&mut app, &mut tui, &rx).await;

        assert!(tui.prompt.is_none());
        assert_eq!(app.list.search_query.as_deref(), Some("phone"));
        assert_eq!(app.list.products.len(), 2);
    }

    #[tokio::test]
    async fn test_sort_key_cycles_without_fetch() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_page(Ok(sample_page(1, 3, 20)));
        let (mut app, mut tui, rx) = setup(catalog.clone());
        app.start(None);
        pump(&mut app, &mut tui, &rx).await;
        let calls = catalog.calls().len();

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('s'));
        assert_eq!(app.list.sort, SortOption::PriceDesc);
        assert_eq!(catalog.calls().len(), calls);
    }

    #[tokio::test]
    async fn test_scrolling_to_end_loads_more() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 20, 20)))
            .push_page(Ok(sample_page(21, 4, 20)));
        let (mut app, mut tui, rx) = setup(catalog.clone());
        app.start(None);
        pump(&mut app, &mut tui, &rx).await;

        handle_event(&mut app, &mut tui, TuiEvent::End);
        pump(&mut app, &mut tui, &rx).await;
        assert_eq!(app.list.products.len(), 24);
        assert!(!app.list.has_more);

        // No more pages: further scrolling fetches nothing
        handle_event(&mut app, &mut tui, TuiEvent::End);
        pump(&mut app, &mut tui, &rx).await;
        assert_eq!(catalog.page_fetches(), 2);
    }

    #[tokio::test]
    async fn test_enter_opens_detail_and_escape_returns() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 3, 20)))
            .push_product(Ok(sample(1, 10.0, None)));
        let (mut app, mut tui, rx) = setup(catalog);
        app.start(None);
        pump(&mut app, &mut tui, &rx).await;

        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        pump(&mut app, &mut tui, &rx).await;
        assert_eq!(
            app.detail.as_ref().and_then(|d| d.product.as_ref()).map(|p| p.id),
            Some(1)
        );

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('r'));
        pump(&mut app, &mut tui, &rx).await;
        assert!(app.detail.as_ref().is_some_and(|d| d.notice.is_some()));

        handle_event(&mut app, &mut tui, TuiEvent::Escape);
        assert!(app.detail.is_none());
        assert_eq!(app.list.products.len(), 3);
    }

    #[tokio::test]
    async fn test_category_keys_select_next_category() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog
            .push_page(Ok(sample_page(1, 3, 20)))
            .push_page(Ok(sample_page(10, 3, 20)));
        let (mut app, mut tui, rx) = setup(catalog);
        app.start(None);
        pump(&mut app, &mut tui, &rx).await;

        handle_event(&mut app, &mut tui, TuiEvent::CursorRight);
        assert_eq!(app.list.selected_category.as_deref(), Some("smartphones"));
    }

    #[tokio::test]
    async fn test_link_prompt_opens_product() {
        let catalog = Arc::new(ScriptedCatalog::new());
        catalog.push_product(Ok(sample(7, 1.0, None)));
        let (mut app, mut tui, rx) = setup(catalog);

        handle_event(&mut app, &mut tui, TuiEvent::InputChar('g'));
        handle_event(
            &mut app,
            &mut tui,
            TuiEvent::Paste("productsapp://product/7".to_string()),
        );
        handle_event(&mut app, &mut tui, TuiEvent::Submit);
        pump(&mut app, &mut tui, &rx).await;

        assert_eq!(app.detail.as_ref().map(|d| d.product_id), Some(7));
    }

    #[test]
    fn test_alert_goes_to_status_bar() {
        let (mut app, _tui, _rx) = setup(Arc::new(ScriptedCatalog::new()));
        show_alert(
            &mut app,
            ReminderAlert {
                title: "Purchase Reminder".to_string(),
                body: "Don't forget to purchase: Mug".to_string(),
                product_title: "Mug".to_string(),
            },
        );
        assert_eq!(
            app.status_message,
            "Purchase Reminder: Don't forget to purchase: Mug"
        );
    }
}
