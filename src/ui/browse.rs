use crate::app::{App, DisplayMode, InputMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::{cards, rows};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + movies(min) + pager(3) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    // ── Header ──
    let filter_info = match app.store.keyword() {
        Some(keyword) => format!("  matching \"{}\"", keyword),
        None => String::new(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Movie List",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   [{} movies{}]", app.store.active_len(), filter_info),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("   view: {}", app.mode.label()),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, chunks[0]);

    // ── Search bar ──
    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_label = if app.input_mode == InputMode::Editing {
        " Title (Enter to search, Esc to cancel): "
    } else {
        " Title (/): "
    };
    let search_bar = Paragraph::new(format!("{}{}", search_label, app.search_input))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(search_style)
                .title(" Search "),
        );
    frame.render_widget(search_bar, chunks[1]);

    if app.input_mode == InputMode::Editing {
        let typed = search_label.width() + app.search_input.width();
        let cursor_x = chunks[1].x + 1 + typed as u16;
        let cursor_y = chunks[1].y + 1;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    // ── Movies ──
    let movies = app.visible_movies();
    if movies.is_empty() {
        let text = if app.loading {
            "Loading movies..."
        } else {
            "No movies to show"
        };
        let empty = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(empty, chunks[2]);
    } else {
        match app.mode {
            DisplayMode::Card => cards::render(app, &movies, frame, chunks[2]),
            DisplayMode::List => rows::render(app, &movies, frame, chunks[2]),
        }
    }

    render_pager(app, frame, chunks[3]);

    // ── Status bar ──
    let key = |k: &'static str| {
        Span::styled(k, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    let status_line = Line::from(vec![
        key(" ←↑↓→"),
        Span::raw(" Select  "),
        key("n/p"),
        Span::raw(" Page  "),
        key("/"),
        Span::raw(" Search  "),
        key("Tab"),
        Span::raw(" View  "),
        key("Enter"),
        Span::raw(" More  "),
        key("+"),
        Span::raw(" Favorite  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[4]);
}

/// One entry per page, the current one highlighted.
fn render_pager(app: &App, frame: &mut Frame, area: Rect) {
    let count = app.page_count();
    let mut spans = Vec::with_capacity(count);
    for n in 1..=count {
        let style = if n == app.current_page {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {} ", n), style));
        spans.push(Span::raw(" "));
    }

    let visible = app.visible_movies().len();
    let first = (app.current_page - 1) * app.page_size;
    let range_info = if visible == 0 {
        format!(" 0 of {} ", app.store.active_len())
    } else {
        format!(" {}-{} of {} ", first + 1, first + visible, app.store.active_len())
    };

    let pager = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Pages ")
            .title_bottom(Line::from(range_info).alignment(Alignment::Right)),
    );
    frame.render_widget(pager, area);
}
