use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::Pane;
use crate::config::ThemeConfig;
use crate::mail::Email;

pub fn render_detail(
    f: &mut Frame,
    area: Rect,
    email: Option<&Email>,
    scroll: u16,
    theme: &ThemeConfig,
) {
    let Some(email) = email else {
        let loading = Paragraph::new(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.fg_muted()),
        )))
        .block(Pane::new(" Email ", true, theme).block());
        f.render_widget(loading, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // From/To/Subject/Date
            Constraint::Min(3),    // Body
        ])
        .split(area);

    let label = Style::default().fg(theme.primary());
    let value = Style::default().fg(theme.fg());
    let header_lines = vec![
        Line::from(vec![
            Span::styled("From:    ", label),
            Span::styled(email.sender.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled("To:      ", label),
            Span::styled(email.recipients.as_str(), value),
        ]),
        Line::from(vec![
            Span::styled("Subject: ", label),
            Span::styled(
                email.subject.as_str(),
                value.add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Date:    ", label),
            Span::styled(email.timestamp.as_str(), Style::default().fg(theme.fg_muted())),
        ]),
    ];
    let header = Paragraph::new(header_lines).block(Pane::new(" Email ", false, theme).block());
    f.render_widget(header, chunks[0]);

    let body = Paragraph::new(email.body.as_str())
        .style(value)
        .block(Pane::new(" Body ", true, theme).block())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);
}
