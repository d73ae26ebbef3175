use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
};

use super::Modal;
use crate::config::ThemeConfig;
use crate::mail::SortKey;

/// Sort options popup. `current` is marked with a check.
pub fn render_sort_menu(
    f: &mut Frame,
    area: Rect,
    selection: usize,
    current: Option<SortKey>,
    theme: &ThemeConfig,
) {
    let modal = Modal::new(" Sort by ", theme);
    let modal_area = modal.centered_rect(28, SortKey::ALL.len() as u16 + 2, area);
    f.render_widget(Clear, modal_area);

    let lines: Vec<Line> = SortKey::ALL
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mark = if current == Some(*key) { "✓" } else { " " };
            let style = if i == selection {
                Style::default()
                    .fg(theme.primary())
                    .bg(theme.selected_bg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.fg())
            };
            Line::from(Span::styled(format!(" {} {}", mark, key.label()), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(modal.block()), modal_area);
}

/// Blocking message shown over the compose form
pub fn render_alert(f: &mut Frame, area: Rect, message: &str, theme: &ThemeConfig) {
    let modal = Modal::new(" Error ", theme);
    let modal_area = modal.centered_rect(50, 6, area);
    f.render_widget(Clear, modal_area);

    let text = vec![
        Line::from(Span::styled(message, Style::default().fg(theme.error()))),
        Line::raw(""),
        Line::from(Span::styled(
            "Press any key",
            Style::default().fg(theme.fg_muted()),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(modal.block())
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, modal_area);
}
