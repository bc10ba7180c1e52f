//! # ProductList Component
//!
//! The scrollable list of products plus its one-line footer.
//!
//! `ProductListState` lives in `TuiState` and owns the selection.
//! `ProductList` is created each frame around borrowed state and the rendered
//! (already sorted) products.
//!
//! Moving the selection to within [`LOAD_MORE_THRESHOLD`] rows of the end
//! emits [`ProductListEvent::NearEnd`]. Whether that actually fetches is the
//! list controller's call.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::product::{Product, format_price, format_rating};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const LOAD_MORE_THRESHOLD: usize = 5;
const PAGE_JUMP: usize = 10;
const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Events emitted by the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductListEvent {
    Open(u64),
    NearEnd,
}

#[derive(Default)]
pub struct ProductListState {
    pub list_state: ListState,
    /// Ids of the rendered rows, in display order
    ids: Vec<u64>,
}

impl ProductListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current row order and keeps the selection in range.
    pub fn sync(&mut self, products: &[Product]) {
        self.ids = products.iter().map(|p| p.id).collect();
        match (self.list_state.selected(), self.ids.len()) {
            (_, 0) => self.list_state.select(None),
            (None, _) => self.list_state.select(Some(0)),
            (Some(i), len) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.list_state.selected().and_then(|i| self.ids.get(i).copied())
    }

    /// Back to the top, e.g. after a new filter replaced the rows.
    pub fn reset(&mut self) {
        self.list_state = ListState::default();
        if !self.ids.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    fn move_to(&mut self, index: usize) -> Option<ProductListEvent> {
        if self.ids.is_empty() {
            return None;
        }
        let index = index.min(self.ids.len() - 1);
        self.list_state.select(Some(index));
        (index + LOAD_MORE_THRESHOLD >= self.ids.len()).then_some(ProductListEvent::NearEnd)
    }
}

impl EventHandler for ProductListState {
    type Event = ProductListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ProductListEvent> {
        let current = self.list_state.selected().unwrap_or(0);
        match event {
            TuiEvent::CursorDown => self.move_to(current + 1),
            TuiEvent::CursorUp => self.move_to(current.saturating_sub(1)),
            TuiEvent::PageDown => self.move_to(current + PAGE_JUMP),
            TuiEvent::PageUp => self.move_to(current.saturating_sub(PAGE_JUMP)),
            TuiEvent::Home => self.move_to(0),
            TuiEvent::End => self.move_to(usize::MAX),
            TuiEvent::Submit => self.selected_id().map(ProductListEvent::Open),
            _ => None,
        }
    }
}

/// What the footer line says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    None,
    LoadingMore,
    LoadMoreFailed(String),
    EndOfResults,
}

pub struct ProductList<'a> {
    pub state: &'a mut ProductListState,
    pub products: &'a [Product],
    pub footer: Footer,
    pub spinner_frame: usize,
}

impl<'a> ProductList<'a> {
    pub fn new(
        state: &'a mut ProductListState,
        products: &'a [Product],
        footer: Footer,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            products,
            footer,
            spinner_frame,
        }
    }

    fn footer_line(&self) -> Line<'static> {
        match &self.footer {
            Footer::None => Line::default(),
            Footer::LoadingMore => Line::from(Span::styled(
                format!(
                    " {} Loading more products...",
                    SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
                ),
                Style::default().fg(Color::Cyan),
            )),
            Footer::LoadMoreFailed(message) => Line::from(Span::styled(
                format!(" Couldn't load more: {message} (scroll to try again)"),
                Style::default().fg(Color::Red),
            )),
            Footer::EndOfResults => Line::from(Span::styled(
                " End of results",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

/// Cuts `text` to at most `max_width` display columns, ending in "…" when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn row(product: &Product, width: usize) -> Line<'static> {
    let mut right = vec![Span::styled(
        format!("{:>10}", format_price(product.price)),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if let Some(rating) = product.rating {
        right.push(Span::styled(
            format!("  ★ {}", format_rating(rating)),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(discount) = product.active_discount() {
        right.push(Span::styled(
            format!("  -{discount:.0}%"),
            Style::default().fg(Color::Magenta),
        ));
    }
    if product.is_low_stock()
        && let Some(label) = product.stock_label()
    {
        right.push(Span::styled(
            format!("  {label}"),
            Style::default().fg(Color::Red),
        ));
    }

    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let title_width = width.saturating_sub(right_width + 1);
    let title = truncate_to_width(&product.title, title_width);
    let padding = title_width.saturating_sub(title.width()) + 1;

    let mut spans = vec![Span::raw(title), Span::raw(" ".repeat(padding))];
    spans.extend(right);
    Line::from(spans)
}

impl<'a> Component for ProductList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        if self.products.is_empty() {
            frame.render_widget(
                Line::from(Span::styled(
                    " No products found",
                    Style::default().fg(Color::DarkGray),
                )),
                list_area,
            );
        } else {
            // Two columns for the highlight symbol
            let width = list_area.width.saturating_sub(2) as usize;
            let items: Vec<ListItem> = self
                .products
                .iter()
                .map(|p| ListItem::new(row(p, width)))
                .collect();
            let list = List::new(items)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("› ");
            frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
        }

        frame.render_widget(self.footer_line(), footer_area);
    }
}
