//! # FilterBar Component
//!
//! One line under the title: category chips on the left, the active sort on
//! the right. When searching, the chips are replaced by the query.
//!
//! ```text
//!  All  [Laptops]  Smartphones  Tops …           Sort: Price: Low to High
//! ```
//!
//! Chips scroll horizontally so the selected one is always visible.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::core::product::category_label;
use crate::core::sort::SortOption;
use crate::tui::component::Component;

const ALL_LABEL: &str = "All";

pub struct FilterBar<'a> {
    pub categories: &'a [String],
    pub selected: Option<&'a str>,
    pub search_query: Option<&'a str>,
    pub sort: SortOption,
}

impl<'a> FilterBar<'a> {
    pub fn new(
        categories: &'a [String],
        selected: Option<&'a str>,
        search_query: Option<&'a str>,
        sort: SortOption,
    ) -> Self {
        Self {
            categories,
            selected,
            search_query,
            sort,
        }
    }

    /// Chip labels, "All" first.
    fn chips(&self) -> Vec<String> {
        std::iter::once(ALL_LABEL.to_string())
            .chain(self.categories.iter().map(|c| category_label(c)))
            .collect()
    }

    /// Index of the selected chip in [`chips`](Self::chips).
    fn selected_chip(&self) -> usize {
        self.selected
            .and_then(|sel| self.categories.iter().position(|c| c == sel))
            .map_or(0, |i| i + 1)
    }
}

/// First chip to draw so that `selected` fits in `width` columns.
fn first_visible_chip(widths: &[usize], selected: usize, width: usize) -> usize {
    let mut first = 0;
    while first < selected {
        let used: usize = widths[first..=selected].iter().sum();
        if used <= width {
            break;
        }
        first += 1;
    }
    first
}

/// The category after (or before) `current` in the chip order, wrapping
/// through "All" (`None`).
pub fn cycle_category(categories: &[String], current: Option<&str>, forward: bool) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    // Slot 0 is "All", slot i + 1 is categories[i]
    let slots = categories.len() + 1;
    let position = current
        .and_then(|c| categories.iter().position(|x| x == c))
        .map_or(0, |i| i + 1);
    let next = if forward {
        (position + 1) % slots
    } else {
        (position + slots - 1) % slots
    };
    next.checked_sub(1).map(|i| categories[i].clone())
}

impl<'a> Component for FilterBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let sort_text = format!(" Sort: {} ", self.sort.label());
        let sort_width = sort_text.width() as u16;
        let [chips_area, sort_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(sort_width)]).areas(area);

        frame.render_widget(
            Line::from(Span::styled(sort_text, Style::default().fg(Color::Yellow))),
            sort_area,
        );

        if let Some(query) = self.search_query {
            let line = Line::from(vec![
                Span::styled(" Search: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    query.to_string(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  (Esc clears)", Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(line, chips_area);
            return;
        }

        let chips = self.chips();
        let selected = self.selected_chip();
        // Each chip is padded by one space per side, plus one separator column
        let widths: Vec<usize> = chips.iter().map(|c| c.width() + 3).collect();
        let first = first_visible_chip(&widths, selected, chips_area.width as usize);

        let mut spans = Vec::new();
        if first > 0 {
            spans.push(Span::styled("‹", Style::default().fg(Color::DarkGray)));
        }
        for (i, chip) in chips.iter().enumerate().skip(first) {
            let style = if i == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {chip} "), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Line::from(spans), chips_area);
    }
}
