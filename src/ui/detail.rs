use crate::app::App;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

pub fn render(app: &App, frame: &mut Frame) {
    let Some(panel) = &app.detail else {
        return;
    };
    let area = centered_rect(70, 60, frame.area());
    frame.render_widget(Clear, area);

    let lines = if panel.loading {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                " Loading...",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else if let Some(error) = &panel.error {
        vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {}", error), Style::default().fg(Color::Red))),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                format!(" {}", panel.title),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Poster: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    panel.poster_url.as_str(),
                    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                ),
            ]),
            Line::from(Span::styled(
                format!(" Release date: {}", panel.release_date),
                Style::default().fg(Color::Yellow),
            )),
            Line::from(""),
            Line::from(format!(" {}", panel.description)),
        ]
    };

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Movie #{} ", panel.movie_id))
            .title_bottom(
                Line::from(" + Favorite  Esc Close ")
                    .alignment(Alignment::Right)
                    .style(Style::default().fg(Color::DarkGray)),
            ),
    );
    frame.render_widget(popup, area);
}
