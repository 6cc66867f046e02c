use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::View;
use crate::config::ThemeConfig;

pub fn render_help(f: &mut Frame, area: Rect, view: View, loading: bool, theme: &ThemeConfig) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_muted());

    let keys: &[(&str, &str)] = match view {
        View::MailboxList => &[
            ("i", "inbox"),
            ("s", "sent"),
            ("a", "archived"),
            ("c", "compose"),
            ("j/k", "nav"),
            ("Enter", "open"),
            ("x", "archive"),
            ("R", "reload"),
            ("q", "quit"),
        ],
        View::EmailDetail => &[
            ("j/k", "scroll"),
            ("r", "reply"),
            ("x", "archive"),
            ("q/Esc", "back"),
        ],
        View::Compose => &[], // Compose has its own help bar
    };

    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(*key, key_style));
        spans.push(Span::styled(format!(" {}  ", action), text_style));
    }
    if loading {
        spans.push(Span::styled("│ ", Style::default().fg(theme.border())));
        spans.push(Span::styled("Loading...", Style::default().fg(theme.secondary())));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_panel()));
    f.render_widget(paragraph, area);
}
