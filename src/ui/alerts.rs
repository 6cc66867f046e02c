use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::alert::{AlertKind, Alerts};
use crate::config::ThemeConfig;

/// One banner line per visible alert, newest on top
pub fn render_alerts(f: &mut Frame, area: Rect, alerts: &Alerts, theme: &ThemeConfig) {
    let lines: Vec<Line> = alerts
        .visible()
        .map(|alert| {
            let (marker, color) = match alert.kind {
                AlertKind::Success => ("✓ ", theme.success()),
                AlertKind::Error => ("✗ ", theme.error()),
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(color)),
                Span::styled(
                    alert.message.as_str(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(theme.bg_panel()));
    f.render_widget(paragraph, area);
}
