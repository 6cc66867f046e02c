use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::Pane;
use crate::app::{ComposeField, ComposeState};
use crate::config::ThemeConfig;

pub fn render_compose(f: &mut Frame, area: Rect, compose: &ComposeState, theme: &ThemeConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Recipients
            Constraint::Length(3), // Subject
            Constraint::Min(5),    // Body
        ])
        .split(area);

    let fields = [
        (" To ", ComposeField::Recipients, compose.recipients.as_str()),
        (" Subject ", ComposeField::Subject, compose.subject.as_str()),
        (" Body ", ComposeField::Body, compose.body.as_str()),
    ];

    for (chunk, (title, field, text)) in chunks.iter().zip(fields) {
        let focused = compose.focus == field;
        let mut content = text.to_string();
        if focused {
            content.push('_');
        }
        let paragraph = Paragraph::new(content)
            .style(Style::default().fg(theme.fg()))
            .block(Pane::new(title, focused, theme).block())
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, *chunk);
    }
}

pub fn render_compose_help(f: &mut Frame, area: Rect, sending: bool, theme: &ThemeConfig) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_muted());

    let line = if sending {
        Line::from(Span::styled("Sending...", text_style))
    } else {
        Line::from(vec![
            Span::styled("Tab", key_style),
            Span::styled(" next field  ", text_style),
            Span::styled("Ctrl-s", key_style),
            Span::styled(" send  ", text_style),
            Span::styled("Ctrl-e", key_style),
            Span::styled(" editor  ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" discard", text_style),
        ])
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(theme.bg_panel()));
    f.render_widget(paragraph, area);
}
