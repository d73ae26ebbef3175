use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::Pane;
use crate::app::ComposeField;
use crate::compose::{TestEmailForm, Timezone};
use crate::config::ThemeConfig;

pub fn render_compose(
    f: &mut Frame,
    area: Rect,
    form: &TestEmailForm,
    focused: ComposeField,
    theme: &ThemeConfig,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Fields
            Constraint::Min(5),    // Body preview
        ])
        .split(area);

    let schedule_style = if form.is_timed {
        Style::default().fg(theme.fg())
    } else {
        Style::default().fg(theme.fg_muted())
    };

    let zone = match Timezone::lookup(&form.timezone) {
        Some(tz) => format!("{} (UTC{:+})", tz.name, tz.offset_hours),
        None => format!("{} (unsupported)", form.timezone),
    };
    let body_summary = if form.body.trim().is_empty() {
        "(empty, press Enter to edit)".to_string()
    } else {
        format!("{} lines", form.body.lines().count())
    };

    let fields = [
        (ComposeField::Recipient, form.recipient.clone(), Style::default().fg(theme.fg())),
        (ComposeField::Subject, form.subject.clone(), Style::default().fg(theme.fg())),
        (ComposeField::Body, body_summary, Style::default().fg(theme.fg_subtle())),
        (
            ComposeField::Timed,
            (if form.is_timed { "[x]" } else { "[ ]" }).to_string(),
            Style::default().fg(theme.fg()),
        ),
        (ComposeField::Date, form.date.clone(), schedule_style),
        (ComposeField::Time, form.time.clone(), schedule_style),
        (ComposeField::Timezone, zone, schedule_style),
    ];

    let lines: Vec<Line> = fields
        .into_iter()
        .map(|(field, value, style)| {
            let is_focused = field == focused;
            let label_style = if is_focused {
                Style::default()
                    .fg(theme.primary())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.warning())
            };
            let mut spans = vec![
                Span::styled(if is_focused { "> " } else { "  " }, label_style),
                Span::styled(format!("{:<10}", format!("{}:", field.label())), label_style),
                Span::styled(value, style),
            ];
            if is_focused && is_text_field(field) {
                spans.push(Span::styled("_", Style::default().fg(theme.primary())));
            }
            Line::from(spans)
        })
        .collect();

    let header = Paragraph::new(lines).block(Pane::new("Send Test Email", true, theme).block());
    f.render_widget(header, chunks[0]);

    let body = Paragraph::new(form.body.as_str())
        .block(Pane::new("Body", focused == ComposeField::Body, theme).block())
        .wrap(Wrap { trim: false });
    f.render_widget(body, chunks[1]);
}

fn is_text_field(field: ComposeField) -> bool {
    matches!(
        field,
        ComposeField::Recipient | ComposeField::Subject | ComposeField::Date | ComposeField::Time
    )
}

pub fn render_compose_help(f: &mut Frame, area: Rect, theme: &ThemeConfig) {
    let key_style = Style::default().fg(theme.primary());
    let text_style = Style::default().fg(theme.fg_subtle());
    let help = Line::from(vec![
        Span::styled("Tab/↑↓", key_style),
        Span::styled(" field  ", text_style),
        Span::styled("Enter", key_style),
        Span::styled(" edit body  ", text_style),
        Span::styled("Space", key_style),
        Span::styled(" toggle  ", text_style),
        Span::styled("←/→", key_style),
        Span::styled(" timezone  ", text_style),
        Span::styled("Ctrl-S", key_style),
        Span::styled(" send  ", text_style),
        Span::styled("Esc", key_style),
        Span::styled(" cancel", text_style),
    ]);

    let paragraph = Paragraph::new(help).style(Style::default().bg(theme.bg_panel()));
    f.render_widget(paragraph, area);
}
