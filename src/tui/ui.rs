use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::detail::DetailState;
use crate::tui::TuiState;
use crate::tui::app::App;
use crate::tui::component::Component;
use crate::tui::components::{
    ErrorView, FilterBar, Footer, ProductDetail, ProductList, Prompt, TitleBar,
};

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(1)]);
    let [title_area, bar_area, main_area, help_area] = layout.areas(frame.area());

    TitleBar::new(app.screen_title(), app.status_message.clone()).render(frame, title_area);

    match &app.detail {
        Some(detail) => {
            draw_detail(frame, bar_area.union(main_area), detail, tui);
        }
        None => {
            FilterBar::new(
                &app.list.categories,
                app.list.selected_category.as_deref(),
                app.list.search_query.as_deref(),
                app.list.sort,
            )
            .render(frame, bar_area);
            draw_list(frame, main_area, app, tui);
        }
    }

    frame.render_widget(help_line(app), help_area);

    if let Some(prompt) = &tui.prompt {
        Prompt::new(prompt).render(frame, frame.area());
    }
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    let list = &app.list;
    if list.shows_full_screen_spinner() {
        draw_loading(frame, area, "Loading products...", tui.spinner_frame);
        return;
    }
    if list.shows_error_view() {
        let message = list
            .error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        ErrorView::new(&message).render(frame, area);
        return;
    }

    let footer = if list.shows_footer_spinner() {
        Footer::LoadingMore
    } else if let Some(error) = list.footer_error() {
        Footer::LoadMoreFailed(error.to_string())
    } else if !list.has_more && !list.products.is_empty() {
        Footer::EndOfResults
    } else {
        Footer::None
    };

    let products = list.rendered_products();
    tui.product_list.sync(&products);
    ProductList::new(&mut tui.product_list, &products, footer, tui.spinner_frame)
        .render(frame, area);
}

fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailState, tui: &mut TuiState) {
    match &detail.product {
        Some(product) => {
            ProductDetail::new(&mut tui.detail_view, product, detail).render(frame, area);
        }
        None if detail.shows_error_view() => {
            let message = detail
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            ErrorView::new(&message).render(frame, area);
        }
        None => draw_loading(frame, area, "Loading product...", tui.spinner_frame),
    }
}

fn draw_loading(frame: &mut Frame, area: Rect, label: &str, spinner_frame: usize) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
    frame.render_widget(
        Paragraph::new(format!("{spinner} {label}"))
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center),
        middle,
    );
}

fn help_line(app: &App) -> Line<'static> {
    let hint = if app.detail.is_some() {
        " ←/→ image  r reminder  x dismiss  l link  g open link  Esc back  q quit"
    } else {
        " ↑/↓ move  Enter open  ←/→ category  s sort  / search  R refresh  g open link  q quit"
    };
    let mut spans = Vec::new();
    if app.list.refreshing && app.detail.is_none() {
        spans.push(Span::styled(" Refreshing...", Style::default().fg(Color::Cyan)));
    }
    spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
    Line::from(spans)
}
