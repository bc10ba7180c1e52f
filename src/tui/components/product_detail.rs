//! # ProductDetail Component
//!
//! Scrollable detail view for one product.
//!
//! Sections are stacked into a `tui_scrollview::ScrollView`. Each section's
//! height is predicted with `textwrap` before rendering, so the scroll view
//! can be sized without a measuring pass.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::detail::{DetailState, Notice};
use crate::core::product::{Product, category_label, format_price, format_rating};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailViewEvent {
    PreviousImage,
    NextImage,
}

#[derive(Default)]
pub struct DetailViewState {
    pub scroll_state: ScrollViewState,
    /// Total content height from the last render
    content_height: u16,
    viewport_height: u16,
}

impl DetailViewState {
    pub fn new() -> Self {
        Self::default()
    }

    fn scroll_by(&mut self, delta: i32) {
        let max_y = self.content_height.saturating_sub(self.viewport_height) as i32;
        let y = (self.scroll_state.offset().y as i32 + delta).clamp(0, max_y.max(0));
        self.scroll_state.set_offset(Position { x: 0, y: y as u16 });
    }
}

impl EventHandler for DetailViewState {
    type Event = DetailViewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<DetailViewEvent> {
        let page = self.viewport_height.max(1) as i32;
        match event {
            TuiEvent::CursorUp => self.scroll_by(-1),
            TuiEvent::CursorDown => self.scroll_by(1),
            TuiEvent::PageUp => self.scroll_by(-page),
            TuiEvent::PageDown => self.scroll_by(page),
            TuiEvent::Home => self.scroll_state.scroll_to_top(),
            TuiEvent::CursorLeft => return Some(DetailViewEvent::PreviousImage),
            TuiEvent::CursorRight => return Some(DetailViewEvent::NextImage),
            _ => {}
        }
        None
    }
}

/// Lines that would be produced by wrapping `text` at `width`.
fn wrapped_height(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    text.lines()
        .map(|line| textwrap::wrap(line, &options).len().max(1))
        .sum::<usize>() as u16
}

fn price_line(product: &Product) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format_price(product.price),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if let (Some(original), Some(discount)) = (product.original_price(), product.active_discount())
    {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format_price(original),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        ));
        spans.push(Span::styled(
            format!("  {discount:.0}% OFF"),
            Style::default().fg(Color::Magenta),
        ));
    }
    Line::from(spans)
}

fn summary_text(product: &Product) -> Text<'static> {
    let mut lines = vec![Line::from(Span::styled(
        product.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(brand) = &product.brand {
        lines.push(Line::from(Span::styled(
            brand.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    let mut meta = Vec::new();
    if let Some(rating) = product.rating {
        meta.push(Span::styled(
            format!("★ {}", format_rating(rating)),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(category) = &product.category {
        if !meta.is_empty() {
            meta.push(Span::raw("  "));
        }
        meta.push(Span::styled(
            category_label(category),
            Style::default().fg(Color::Cyan),
        ));
    }
    if !meta.is_empty() {
        lines.push(Line::from(meta));
    }
    lines.push(Line::default());
    lines.push(price_line(product));
    if let Some(label) = product.stock_label() {
        let color = if product.is_low_stock() {
            Color::Red
        } else {
            Color::Green
        };
        lines.push(Line::from(Span::styled(label, Style::default().fg(color))));
    }
    Text::from(lines)
}

fn images_text(product: &Product, selected: usize) -> Text<'static> {
    let mut lines = vec![Line::from(Span::styled(
        "Images (←/→)",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if product.images.is_empty() {
        let fallback = product.image_at(0).unwrap_or("no image");
        lines.push(Line::from(Span::styled(
            format!("  {fallback}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, url) in product.images.iter().enumerate() {
        let (marker, style) = if i == selected {
            ("›", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        } else {
            (" ", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(Span::styled(format!("{marker} {url}"), style)));
    }
    Text::from(lines)
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let color = match notice {
        Notice::Success(_) => Color::Green,
        Notice::PartialSuccess(_) => Color::Yellow,
        Notice::Failure(_) => Color::Red,
    };
    Line::from(vec![
        Span::styled(notice.message().to_string(), Style::default().fg(color)),
        Span::styled("  (x to dismiss)", Style::default().fg(Color::DarkGray)),
    ])
}

pub struct ProductDetail<'a> {
    pub state: &'a mut DetailViewState,
    pub product: &'a Product,
    pub detail: &'a DetailState,
}

impl<'a> ProductDetail<'a> {
    pub fn new(state: &'a mut DetailViewState, product: &'a Product, detail: &'a DetailState) -> Self {
        Self {
            state,
            product,
            detail,
        }
    }

    fn reminder_line(&self) -> Line<'static> {
        if self.detail.reminder_pending {
            Line::from(Span::styled(
                "Adding reminder...",
                Style::default().fg(Color::Cyan),
            ))
        } else {
            Line::from(Span::styled(
                "Press r to add a purchase reminder",
                Style::default().fg(Color::DarkGray),
            ))
        }
    }
}

impl<'a> Component for ProductDetail<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1); // scrollbar

        let summary = summary_text(self.product);
        let description = self.product.description.clone().unwrap_or_default();
        let images = images_text(self.product, self.detail.image_index);
        let mut footer = vec![Line::default(), self.reminder_line()];
        if let Some(notice) = &self.detail.notice {
            footer.push(notice_line(notice));
        }
        let footer = Text::from(footer);

        let sections: Vec<(Paragraph, u16)> = vec![
            (Paragraph::new(summary.clone()), summary.lines.len() as u16 + 1),
            (
                Paragraph::new(description.clone()).wrap(Wrap { trim: true }),
                wrapped_height(&description, width) + 1,
            ),
            (Paragraph::new(images.clone()), images.lines.len() as u16),
            (Paragraph::new(footer.clone()), footer.lines.len() as u16),
        ];

        let total: u16 = sections.iter().map(|(_, h)| *h).sum();
        self.state.content_height = total;
        self.state.viewport_height = area.height;

        let mut scroll_view = ScrollView::new(Size::new(width, total))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        let mut y = 0;
        for (paragraph, height) in sections {
            scroll_view.render_widget(paragraph, Rect::new(0, y, width, height));
            y += height;
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
