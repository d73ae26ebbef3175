use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Wrap},
};

use super::Pane;
use crate::config::ThemeConfig;

/// Service response shown verbatim
pub fn render_response(
    f: &mut Frame,
    area: Rect,
    content: &str,
    scroll: u16,
    theme: &ThemeConfig,
) {
    let paragraph = Paragraph::new(content)
        .style(Style::default().fg(theme.fg()).bg(theme.bg()))
        .block(Pane::new("Response", true, theme).block())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
}
