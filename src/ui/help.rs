use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::View;
use crate::config::ThemeConfig;

pub fn render_help(
    f: &mut Frame,
    area: Rect,
    view: View,
    status: Option<&str>,
    filter_input: Option<&str>,
    theme: &ThemeConfig,
) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_subtle());
    let input_style = Style::default().fg(theme.fg());
    let muted_style = Style::default().fg(theme.fg_muted());

    let help_text = match view {
        View::Filter => vec![
            Span::styled("/", key_style),
            Span::raw(" "),
            Span::styled(filter_input.unwrap_or(""), input_style),
            Span::styled("_", key_style),
            Span::styled("  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" apply  ", text_style),
            Span::styled("Esc", key_style),
            Span::styled(" cancel  ", text_style),
            Span::styled("(field:\"value\" or field:\"INCLUDES:value\")", muted_style),
        ],
        View::List => vec![
            Span::styled("j/k", key_style),
            Span::styled(" nav  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" details  ", text_style),
            Span::styled("e/E", key_style),
            Span::styled(" expand/collapse all  ", text_style),
            Span::styled("/", key_style),
            Span::styled(" filter  ", text_style),
            Span::styled("x", key_style),
            Span::styled(" clear  ", text_style),
            Span::styled("s", key_style),
            Span::styled(" sort  ", text_style),
            Span::styled("c", key_style),
            Span::styled(" test email  ", text_style),
            Span::styled("p", key_style),
            Span::styled(" ping  ", text_style),
            Span::styled("R", key_style),
            Span::styled(" reload  ", text_style),
            Span::styled("q", key_style),
            Span::styled(" quit", text_style),
        ],
        View::SortMenu => vec![
            Span::styled("j/k", key_style),
            Span::styled(" choose  ", text_style),
            Span::styled("Enter", key_style),
            Span::styled(" sort  ", text_style),
            Span::styled("s/Esc", key_style),
            Span::styled(" close", text_style),
        ],
        View::Response => vec![
            Span::styled("j/k", key_style),
            Span::styled(" scroll  ", text_style),
            Span::styled("q/Esc", key_style),
            Span::styled(" back", text_style),
        ],
        View::Compose => vec![], // Compose has its own help bar
    };

    let mut line = Line::from(help_text);

    // Add status message if present
    if let Some(msg) = status {
        line.spans
            .push(Span::styled("  │  ", Style::default().fg(theme.border())));
        line.spans
            .push(Span::styled(msg, Style::default().fg(theme.success())));
    }

    let paragraph = Paragraph::new(line).style(Style::default().bg(theme.bg_panel()));

    f.render_widget(paragraph, area);
}
