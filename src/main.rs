use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use mailadmin::app::{App, ComposeField, View};
use mailadmin::compose::{edit_in_editor, editor_command, submit};
use mailadmin::config::Config;
use mailadmin::logging;
use mailadmin::mail::{self, Entry};
use mailadmin::service::{Offline, ServiceClient, Transport};
use mailadmin::ui::{
    EntryRow, render_alert, render_compose, render_compose_help, render_entries, render_help,
    render_response, render_sort_menu,
};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Parser)]
#[command(name = "mailadmin", version, about = "Terminal admin console for the email service")]
struct Cli {
    /// JSON file with email records (skips the service)
    #[arg(long)]
    entries: Option<String>,
    /// Config file (default: ~/.config/mailadmin/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_file_tracing(&logging::log_dir());

    let config = Arc::new(match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    });

    let client = match ServiceClient::new(&config.service) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!("service client unavailable: {:#}", e);
            None
        }
    };

    let entries_path = cli.entries.or_else(|| config.source.entries.clone());
    let (entries, source_label) = load_entries(entries_path.as_deref(), client.as_ref());
    let mut app = App::new(entries, config, source_label);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, client.as_ref(), entries_path.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("console exited with error: {:#}", e);
    }
    result
}

/// Load entries from a file if one is configured, else from the service,
/// else from the last snapshot
fn load_entries(path: Option<&str>, client: Option<&ServiceClient>) -> (Vec<Entry>, String) {
    if let Some(path) = path {
        return match mail::load_entries(path) {
            Ok(entries) => (entries, path.to_string()),
            Err(e) => {
                error!("{:#}", e);
                (Vec::new(), format!("{} (unreadable)", path))
            }
        };
    }

    let snapshot = mail::snapshot_path();
    if let Some(client) = client {
        match client.fetch_entries() {
            Ok(entries) => {
                if let Some(path) = &snapshot {
                    if let Err(e) = mail::save_snapshot(path, &entries) {
                        warn!("could not save snapshot: {:#}", e);
                    }
                }
                return (entries, "service".to_string());
            }
            Err(e) => warn!("fetching entries failed: {:#}", e),
        }
    }

    let entries = snapshot
        .as_deref()
        .map(mail::load_snapshot)
        .unwrap_or_default();
    info!(count = entries.len(), "using snapshot");
    (entries, "snapshot".to_string())
}

fn run(
    terminal: &mut Term,
    app: &mut App,
    client: Option<&ServiceClient>,
    entries_path: Option<&str>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(app, f))?;

        // Poll with timeout so we redraw on resize
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Any key dismisses an alert
        if app.alert.is_some() {
            app.dismiss_alert();
            continue;
        }

        app.clear_status();
        match app.view {
            View::List => match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Esc => {
                    if !app.applied_filter.is_empty() {
                        app.clear_filter();
                    }
                }
                KeyCode::Char('j') | KeyCode::Down => app.next(),
                KeyCode::Char('k') | KeyCode::Up => app.previous(),
                KeyCode::Enter | KeyCode::Char(' ') => app.toggle_details(),
                KeyCode::Char('e') => app.expand_all(),
                KeyCode::Char('E') => app.collapse_all(),
                KeyCode::Char('/') => app.start_filter(),
                KeyCode::Char('x') => app.clear_filter(),
                KeyCode::Char('s') => app.toggle_sort_menu(),
                KeyCode::Char('c') => app.start_compose(),
                KeyCode::Char('p') => ping(app, client),
                KeyCode::Char('R') => {
                    let (entries, label) = load_entries(entries_path, client);
                    app.replace_entries(entries);
                    app.source_label = label;
                    app.set_status("Reloaded");
                }
                _ => {}
            },
            View::Filter => match key.code {
                KeyCode::Esc => app.cancel_filter(),
                KeyCode::Enter => app.apply_filter(),
                KeyCode::Backspace => {
                    app.filter_input.pop();
                }
                KeyCode::Char(c) => app.filter_input.push(c),
                _ => {}
            },
            View::SortMenu => match key.code {
                KeyCode::Char('j') | KeyCode::Down => app.sort_menu_next(),
                KeyCode::Char('k') | KeyCode::Up => app.sort_menu_prev(),
                KeyCode::Enter => app.choose_sort(),
                KeyCode::Char('s') | KeyCode::Esc => app.toggle_sort_menu(),
                _ => {}
            },
            View::Compose => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if key.code == KeyCode::Char('s') {
                        send_test_email(app, client);
                    }
                    continue;
                }
                match key.code {
                    KeyCode::Esc => {
                        app.view = View::List;
                        app.set_status("Draft discarded");
                    }
                    KeyCode::Tab | KeyCode::Down => app.compose_next_field(),
                    KeyCode::BackTab | KeyCode::Up => app.compose_prev_field(),
                    KeyCode::Enter if app.compose_field == ComposeField::Body => {
                        edit_body(terminal, app)?
                    }
                    KeyCode::Enter if app.compose_field == ComposeField::Timed => {
                        app.toggle_timed()
                    }
                    KeyCode::Enter => app.compose_next_field(),
                    KeyCode::Left if app.compose_field == ComposeField::Timezone => {
                        app.cycle_timezone(false)
                    }
                    KeyCode::Right if app.compose_field == ComposeField::Timezone => {
                        app.cycle_timezone(true)
                    }
                    KeyCode::Backspace => app.compose_backspace(),
                    KeyCode::Char(c) => app.compose_input(c),
                    _ => {}
                }
            }
            View::Response => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.close_response(),
                KeyCode::Char('j') | KeyCode::Down => app.response_scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => app.response_scroll_up(),
                _ => {}
            },
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn render(app: &mut App, f: &mut Frame) {
    let area = f.area();
    let config = app.config.clone();
    let theme = &config.theme;

    // Split into main area and help bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Compose => {
            render_compose(f, chunks[0], &app.compose, app.compose_field, theme);
            render_compose_help(f, chunks[1], theme);
            if let Some(msg) = &app.alert {
                render_alert(f, area, msg, theme);
            }
            return;
        }
        View::Response => {
            render_response(f, chunks[0], &app.response, app.response_scroll, theme);
        }
        View::List | View::Filter | View::SortMenu => {
            let rows: Vec<EntryRow> = app
                .filtered_indices
                .iter()
                .map(|&i| (&app.entries[i], app.expanded[i]))
                .collect();

            let mut title = format!("[{}] Emails", app.source_label);
            if !app.applied_filter.is_empty() {
                title.push_str(&format!(
                    " | {} ({} of {})",
                    app.applied_filter,
                    rows.len(),
                    app.entries.len()
                ));
            }
            if let Some(key) = app.sort_key {
                title.push_str(&format!(" | {}", key));
            }

            render_entries(
                f,
                chunks[0],
                &rows,
                &mut app.list_state,
                &title,
                theme,
                &config.layout,
            );

            if app.view == View::SortMenu {
                render_sort_menu(f, chunks[0], app.sort_selection, app.sort_key, theme);
            }
        }
    }

    let filter_input = if app.view == View::Filter {
        Some(app.filter_input.as_str())
    } else {
        None
    };
    render_help(
        f,
        chunks[1],
        app.view,
        app.status_message.as_deref(),
        filter_input,
        theme,
    );
}

fn ping(app: &mut App, client: Option<&ServiceClient>) {
    let Some(client) = client else {
        app.set_status("Service client unavailable");
        return;
    };
    match client.ping() {
        Ok(text) => app.set_status(&format!("Service up: {}", text.trim())),
        Err(e) => {
            warn!("ping failed: {:#}", e);
            app.set_status(&format!("Ping failed: {}", e));
        }
    }
}

fn send_test_email(app: &mut App, client: Option<&ServiceClient>) {
    let offline = Offline("service client unavailable".to_string());
    let transport: &dyn Transport = match client {
        Some(c) => c,
        None => &offline,
    };

    match submit(&app.compose, transport, &app.config.service.test_email_path) {
        Ok(text) => app.show_response(text),
        Err(e) => app.set_alert(&e.to_string()),
    }
}

/// Edit the message body in $EDITOR. Editor failures become an alert and the
/// draft is kept.
fn edit_body(terminal: &mut Term, app: &mut App) -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;

    let edited = edit_in_editor(&editor_command(), &app.compose.body);

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    terminal.clear()?;

    match edited {
        Ok(Some(body)) => app.compose.body = body,
        Ok(None) => app.set_alert("Editor exited with an error, body unchanged."),
        Err(e) => {
            warn!("editing body failed: {:#}", e);
            app.set_alert(&format!("{:#}", e));
        }
    }
    Ok(())
}
