use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};

use super::Pane;
use crate::config::{LayoutConfig, ThemeConfig};
use crate::mail::{Entry, sort::status_code};

/// One visible list row: the entry and whether its details are expanded
pub type EntryRow<'a> = (&'a Entry, bool);

pub fn render_entries(
    f: &mut Frame,
    area: Rect,
    rows: &[EntryRow<'_>],
    state: &mut ListState,
    title: &str,
    theme: &ThemeConfig,
    layout: &LayoutConfig,
) {
    // Available width: area minus borders (2) minus highlight symbol (2)
    let avail_width = area.width.saturating_sub(4) as usize;
    let date_width = layout.date_width;
    let status_width = layout.status_width;
    let recipient_width = layout
        .recipient_width
        .min(avail_width.saturating_sub(date_width + status_width + 6) / 2);
    let subject_width =
        avail_width.saturating_sub(date_width + status_width + recipient_width + 6);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|(entry, expanded)| {
            let arrow = if *expanded { "▾" } else { "▸" };
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{} ", arrow), Style::default().fg(theme.fg_muted())),
                Span::styled(
                    format!("{} ", truncate(&entry.sent_display(), date_width)),
                    Style::default().fg(theme.fg_subtle()),
                ),
                Span::styled(
                    format!("{} ", truncate(&entry.status_display(), status_width)),
                    Style::default().fg(theme.status(status_code(entry))),
                ),
                Span::styled(
                    format!("{} ", truncate(&entry.recipient_display(), recipient_width)),
                    Style::default().fg(theme.fg()),
                ),
                Span::styled(
                    truncate(&entry.subject_display(), subject_width),
                    Style::default().fg(theme.fg()),
                ),
            ])];
            if *expanded {
                lines.extend(detail_lines(entry, theme));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(Pane::new(title, true, theme).block())
        .style(Style::default().bg(theme.bg()))
        .highlight_style(
            Style::default()
                .bg(theme.selected_bg())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, state);
}

/// Every field of the entry, one per line
fn detail_lines<'a>(entry: &'a Entry, theme: &ThemeConfig) -> Vec<Line<'a>> {
    let name_width = entry
        .fields
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    entry
        .fields
        .iter()
        .map(|(name, value)| {
            Line::from(vec![
                Span::styled(
                    format!("    {:width$}  ", name, width = name_width),
                    Style::default().fg(theme.secondary()),
                ),
                Span::styled(value.as_str(), Style::default().fg(theme.fg_subtle())),
            ])
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if max < 4 {
        return s.chars().take(max).collect();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        format!("{:width$}", s, width = max)
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}
