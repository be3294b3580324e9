use crate::api::Movie;
use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use std::sync::Arc;

use super::truncate_str;

/// One row per movie: id, title, then the two actions.
pub fn render(app: &App, movies: &[Arc<Movie>], frame: &mut Frame, area: Rect) {
    // id(6) + actions(14) + borders and highlight symbol(4)
    let title_width = (area.width as usize).saturating_sub(24);

    let items: Vec<ListItem> = movies
        .iter()
        .map(|movie| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:>5} ", movie.id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(
                    "{:<width$}",
                    truncate_str(&movie.title, title_width),
                    width = title_width
                )),
                Span::styled(" [More]", Style::default().fg(Color::Blue)),
                Span::styled(" [+]", Style::default().fg(Color::Cyan)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Movies ")
                .title_bottom(
                    Line::from(format!(" page {} ", app.current_page)).alignment(Alignment::Right),
                ),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected));
    frame.render_stateful_widget(list_widget, area, &mut list_state);
}
