//! # TitleBar Component
//!
//! Top line of every screen: app name, the current screen's title, and a
//! transient status message (reminder alerts, link errors).
//!
//! Stateless. The title text is formatted in priority order so the most
//! important part survives on narrow terminals:
//!
//! 1. **Status message**: `"Shelf | Laptops | Reminder: Don't forget..."`
//! 2. **Default**: `"Shelf | Laptops"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    /// Screen title, e.g. "All Products" or a product name
    pub screen_title: String,
    /// Transient status (empty = none)
    pub status_message: String,
}

impl TitleBar {
    pub fn new(screen_title: String, status_message: String) -> Self {
        Self {
            screen_title,
            status_message,
        }
    }

    fn text(&self) -> String {
        if self.status_message.is_empty() {
            format!("Shelf | {}", self.screen_title)
        } else {
            format!("Shelf | {} | {}", self.screen_title, self.status_message)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("Laptops".to_string(), "Link not recognized".to_string());
        let text = rendered(&mut title_bar);
        assert!(text.contains("Shelf | Laptops | Link not recognized"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("All Products".to_string(), String::new());
        let text = rendered(&mut title_bar);
        assert!(text.contains("Shelf | All Products"));
        assert_eq!(text.matches('|').count(), 1);
    }
}
