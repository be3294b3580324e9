use crate::app::Notice;
use ratatui::{
    Frame,
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

pub fn render(notice: &Notice, frame: &mut Frame) {
    let area = centered_rect(60, 25, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];

    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" {} ", notice.title))
                .title_bottom(
                    Line::from(" Press any key ").style(Style::default().fg(Color::DarkGray)),
                ),
        );
    frame.render_widget(popup, area);
}
