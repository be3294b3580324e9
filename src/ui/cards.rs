use crate::api::Movie;
use crate::app::{App, CARDS_PER_ROW};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::sync::Arc;

use super::truncate_str;

/// Border, poster line, spacer and title.
const MIN_CARD_HEIGHT: u16 = 5;

/// Poster, title and the two actions, four cards to a row.
pub fn render(app: &App, movies: &[Arc<Movie>], frame: &mut Frame, area: Rect) {
    let (first_row, shown) = visible_rows(
        movies.len().div_ceil(CARDS_PER_ROW),
        app.selected / CARDS_PER_ROW,
        area.height,
    );
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, shown as u32); shown])
        .split(area);

    let rows = movies.chunks(CARDS_PER_ROW).enumerate().skip(first_row).take(shown);
    for (slot, (row_index, row)) in rows.enumerate() {
        let card_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, CARDS_PER_ROW as u32); CARDS_PER_ROW])
            .split(row_areas[slot]);

        for (col, movie) in row.iter().enumerate() {
            let index = row_index * CARDS_PER_ROW + col;
            render_card(app, movie, index == app.selected, frame, card_areas[col]);
        }
    }
}

/// Rows that fit in `height`, scrolled so `selected_row` stays on screen.
/// Returns the first row to draw and how many rows to draw.
fn visible_rows(total_rows: usize, selected_row: usize, height: u16) -> (usize, usize) {
    let fit = usize::from(height / MIN_CARD_HEIGHT).max(1);
    let shown = total_rows.min(fit).max(1);
    let first_row = (selected_row + 1).saturating_sub(shown);
    (first_row, shown)
}

fn render_card(app: &App, movie: &Movie, selected: bool, frame: &mut Frame, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let inner_width = area.width.saturating_sub(2) as usize;

    let lines = vec![
        Line::from(Span::styled(
            format!("▣ {}", truncate_str(&movie.image, inner_width.saturating_sub(2))),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            movie.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    let actions = Line::from(vec![
        Span::styled(" More ", action_style(selected, Color::Blue)),
        Span::raw(" "),
        Span::styled(" + ", action_style(selected, Color::Cyan)),
    ]);

    let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" #{} ", movie.id))
            .title_bottom(actions),
    );
    frame.render_widget(card, area);

    // The poster itself cannot be drawn; point at it instead.
    if selected && inner_width > 0 && area.height > 5 {
        let hint = truncate_str(&app.api.poster_url(&movie.image), inner_width);
        let hint_area = Rect {
            x: area.x + 1,
            y: area.y + area.height - 2,
            width: area.width - 2,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            hint_area,
        );
    }
}

fn action_style(selected: bool, color: Color) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(color)
    } else {
        Style::default().fg(color)
    }
}
