//! # Prompt Component
//!
//! Single-line text overlay used for search queries and deep-link entry.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `PromptState` lives in `TuiState` while the prompt is open
//! - `Prompt` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    Link,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::Search => " Search products ",
            PromptKind::Link => " Open link ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Submit(PromptKind, String),
    Cancel,
}

pub struct PromptState {
    pub kind: PromptKind,
    pub buffer: String,
}

impl PromptState {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        Self {
            kind,
            buffer: initial.into(),
        }
    }
}

impl EventHandler for PromptState {
    type Event = PromptEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<PromptEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.push(*c);
                None
            }
            // Pasted newlines would submit half a link
            TuiEvent::Paste(text) => {
                self.buffer.extend(text.chars().filter(|c| *c != '\n' && *c != '\r'));
                None
            }
            TuiEvent::Backspace => {
                self.buffer.pop();
                None
            }
            TuiEvent::Submit => Some(PromptEvent::Submit(self.kind, self.buffer.trim().to_string())),
            TuiEvent::Escape => Some(PromptEvent::Cancel),
            _ => None,
        }
    }
}

pub struct Prompt<'a> {
    pub state: &'a PromptState,
}

impl<'a> Prompt<'a> {
    pub fn new(state: &'a PromptState) -> Self {
        Self { state }
    }
}

impl<'a> Component for Prompt<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [_, row, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, overlay, _] = Layout::horizontal([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .areas(row);

        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(self.state.kind.title())
            .title_bottom(Line::from(" Enter Confirm  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);

        // Keep the end of long input visible
        let visible = inner.width.saturating_sub(1) as usize;
        let width = self.state.buffer.width();
        let offset = width.saturating_sub(visible) as u16;

        frame.render_widget(
            Paragraph::new(self.state.buffer.as_str())
                .block(block)
                .scroll((0, offset)),
            overlay,
        );
        frame.set_cursor_position((
            inner.x + (width as u16).saturating_sub(offset),
            inner.y,
        ));
    }
}
