//! Full-area error with a retry hint. Used when a screen has nothing to show
//! but a failure.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::tui::component::Component;

pub struct ErrorView<'a> {
    pub message: &'a str,
}

impl<'a> ErrorView<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl<'a> Component for ErrorView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        let text = vec![
            Line::from(Span::styled(
                "Oops! Something went wrong",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(self.message.to_string()),
            Line::default(),
            Line::from(Span::styled(
                "Press r to retry",
                Style::default().fg(Color::Cyan),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, middle);
    }
}
