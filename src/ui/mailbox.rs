use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use super::Pane;
use crate::config::{LayoutConfig, ThemeConfig};
use crate::mail::{EmailRow, ReadStyle};

#[allow(clippy::too_many_arguments)]
pub fn render_mailbox(
    f: &mut Frame,
    area: Rect,
    heading: &str,
    rows: &[EmailRow],
    state: &mut ListState,
    loading: bool,
    layout: &LayoutConfig,
    theme: &ThemeConfig,
) {
    let title = format!(" {} ", heading);
    let block = Pane::new(&title, true, theme).block();

    if rows.is_empty() {
        let text = if loading { "Loading..." } else { "No emails" };
        let empty = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(theme.fg_muted()),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    // Available width: area minus borders (2) minus highlight symbol (2)
    let avail_width = area.width.saturating_sub(4) as usize;
    let control_width = "[Unarchive]".len() + 1;
    let date_width = layout.date_width;
    let sender_width = layout
        .sender_width
        .min(avail_width.saturating_sub(date_width + control_width) / 3);
    let summary_width =
        avail_width.saturating_sub(date_width + sender_width + control_width + 2);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let style = match row.style {
                ReadStyle::Unread => Style::default()
                    .fg(theme.unread())
                    .add_modifier(Modifier::BOLD),
                ReadStyle::Read => Style::default().fg(theme.fg_muted()),
            };
            let subject_preview = summary(&row.subject, &row.preview, summary_width);
            let mut spans = vec![
                Span::styled(
                    format!("{:w$} ", pad(&row.sender, sender_width), w = sender_width),
                    style,
                ),
                Span::styled(
                    format!("{:w$} ", subject_preview, w = summary_width),
                    style,
                ),
                Span::styled(
                    format!("{:w$}", pad(&row.date, date_width), w = date_width),
                    Style::default().fg(theme.fg_muted()),
                ),
            ];
            if let Some(control) = row.archive_control {
                spans.push(Span::styled(
                    format!(" [{}]", control.label()),
                    Style::default().fg(theme.secondary()),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, state);
}

/// "subject: preview" in `width` columns. The preview is already cut to
/// its configured length, so only the subject is shortened unless the
/// column is too narrow for both.
fn summary(subject: &str, preview: &str, width: usize) -> String {
    let subject_width = width.saturating_sub(preview.chars().count() + 2);
    if subject_width < 4 {
        return pad(&format!("{}: {}", subject, preview), width);
    }
    format!("{}: {}", pad(subject, subject_width), preview)
}

fn pad(s: &str, max: usize) -> String {
    if max < 4 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}
