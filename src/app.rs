use ratatui::widgets::ListState;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::compose::{TIMEZONES, TestEmailForm, Timezone};
use crate::config::Config;
use crate::mail::{self, Entry, SortKey};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    List,
    Filter,
    SortMenu,
    Compose,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Recipient,
    Subject,
    Body,
    Timed,
    Date,
    Time,
    Timezone,
}

impl ComposeField {
    pub const ALL: [ComposeField; 7] = [
        ComposeField::Recipient,
        ComposeField::Subject,
        ComposeField::Body,
        ComposeField::Timed,
        ComposeField::Date,
        ComposeField::Time,
        ComposeField::Timezone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComposeField::Recipient => "To",
            ComposeField::Subject => "Subject",
            ComposeField::Body => "Body",
            ComposeField::Timed => "Timed",
            ComposeField::Date => "Date",
            ComposeField::Time => "Time",
            ComposeField::Timezone => "Timezone",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct App {
    pub config: Arc<Config>,
    pub view: View,
    /// Entries in display order
    pub entries: Vec<Entry>,
    /// Visibility per entry, index-aligned with `entries`
    pub visible: Vec<bool>,
    /// Details expanded per entry, index-aligned with `entries`
    pub expanded: Vec<bool>,
    pub filtered_indices: Vec<usize>,
    pub list_state: ListState,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Where the entries came from, shown in the list title
    pub source_label: String,
    // Filter bar
    pub filter_input: String,
    pub applied_filter: String,
    // Sort menu
    pub sort_key: Option<SortKey>,
    pub sort_selection: usize,
    // Test email form
    pub compose: TestEmailForm,
    pub compose_field: ComposeField,
    pub alert: Option<String>,
    // Service response pane
    pub response: String,
    pub response_scroll: u16,
}

impl App {
    pub fn new(entries: Vec<Entry>, config: Arc<Config>, source_label: String) -> Self {
        let mut list_state = ListState::default();
        if !entries.is_empty() {
            list_state.select(Some(0));
        }

        let count = entries.len();

        Self {
            config,
            view: View::List,
            entries,
            visible: vec![true; count],
            expanded: vec![false; count],
            filtered_indices: (0..count).collect(),
            list_state,
            should_quit: false,
            status_message: None,
            source_label,
            filter_input: String::new(),
            applied_filter: String::new(),
            sort_key: None,
            sort_selection: 0,
            compose: TestEmailForm::default(),
            compose_field: ComposeField::Recipient,
            alert: None,
            response: String::new(),
            response_scroll: 0,
        }
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Swap in a freshly loaded list, keeping the active filter and sort
    pub fn replace_entries(&mut self, entries: Vec<Entry>) {
        let count = entries.len();
        self.entries = entries;
        self.visible = vec![true; count];
        self.expanded = vec![false; count];
        if let Some(key) = self.sort_key {
            self.sort(key);
        }
        self.refilter();
        info!(count, "entries replaced");
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state
            .selected()
            .and_then(|i| self.filtered_indices.get(i))
            .copied()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected_index().and_then(|idx| self.entries.get(idx))
    }

    pub fn next(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let max = self.filtered_indices.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(max),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    // Filter

    pub fn start_filter(&mut self) {
        self.filter_input = self.applied_filter.clone();
        self.view = View::Filter;
    }

    pub fn cancel_filter(&mut self) {
        self.filter_input = self.applied_filter.clone();
        self.view = View::List;
    }

    /// Apply the text in the filter bar
    pub fn apply_filter(&mut self) {
        self.applied_filter = self.filter_input.trim().to_string();
        self.refilter();
        self.view = View::List;
        debug!(query = %self.applied_filter, shown = self.filtered_indices.len(), "filter applied");
        if self.applied_filter.is_empty() {
            self.set_status("Filter cleared");
        } else {
            let msg = format!(
                "{} of {} shown",
                self.filtered_indices.len(),
                self.entries.len()
            );
            self.set_status(&msg);
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter_input.clear();
        self.apply_filter();
    }

    fn refilter(&mut self) {
        self.visible = mail::filter(&self.applied_filter, &self.entries);
        self.rebuild_indices(None);
    }

    /// Recompute the visible index list, keeping `keep` selected if it is
    /// still visible
    fn rebuild_indices(&mut self, keep: Option<usize>) {
        let previous = keep.or_else(|| self.selected_index());
        self.filtered_indices = self
            .visible
            .iter()
            .enumerate()
            .filter(|(_, v)| **v)
            .map(|(i, _)| i)
            .collect();

        let position = previous.and_then(|idx| self.filtered_indices.iter().position(|&i| i == idx));
        match position {
            Some(pos) => self.list_state.select(Some(pos)),
            None if self.filtered_indices.is_empty() => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
        }
    }

    // Sort

    pub fn toggle_sort_menu(&mut self) {
        self.view = if self.view == View::SortMenu {
            View::List
        } else {
            View::SortMenu
        };
    }

    pub fn sort_menu_next(&mut self) {
        self.sort_selection = (self.sort_selection + 1) % SortKey::ALL.len();
    }

    pub fn sort_menu_prev(&mut self) {
        self.sort_selection = (self.sort_selection + SortKey::ALL.len() - 1) % SortKey::ALL.len();
    }

    /// Sort by the highlighted menu item and close the menu
    pub fn choose_sort(&mut self) {
        let key = SortKey::ALL[self.sort_selection % SortKey::ALL.len()];
        self.sort(key);
        self.toggle_sort_menu();
    }

    /// Reorder entries by `key`. Visibility, expansion and the selected entry
    /// move with their entries.
    pub fn sort(&mut self, key: SortKey) {
        if self.entries.is_empty() {
            return;
        }
        let selected = self.selected_index();
        let order = mail::sorted_indices(key, &self.entries);

        let mut entries: Vec<Option<Entry>> = std::mem::take(&mut self.entries)
            .into_iter()
            .map(Some)
            .collect();
        self.entries = order.iter().filter_map(|&i| entries[i].take()).collect();
        self.visible = order.iter().map(|&i| self.visible[i]).collect();
        self.expanded = order.iter().map(|&i| self.expanded[i]).collect();

        let keep = selected.and_then(|old| order.iter().position(|&i| i == old));
        self.rebuild_indices(keep);
        self.sort_key = Some(key);
        self.set_status(&format!("Sorted by {}", key));
    }

    /// Sort by a menu label; unknown labels are logged and ignored
    pub fn sort_by_label(&mut self, label: &str) {
        match label.parse::<SortKey>() {
            Ok(key) => self.sort(key),
            Err(e) => warn!("{e}"),
        }
    }

    // Details

    pub fn toggle_details(&mut self) {
        if let Some(idx) = self.selected_index() {
            if let Some(flag) = self.expanded.get_mut(idx) {
                *flag = !*flag;
            }
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded.iter_mut().for_each(|e| *e = true);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.iter_mut().for_each(|e| *e = false);
    }

    // Test email form

    pub fn start_compose(&mut self) {
        self.compose = TestEmailForm {
            timezone: self.config.compose.default_timezone.clone(),
            ..TestEmailForm::default()
        };
        self.compose_field = ComposeField::Recipient;
        self.alert = None;
        self.view = View::Compose;
    }

    pub fn compose_next_field(&mut self) {
        self.compose_field = self.compose_field.next();
    }

    pub fn compose_prev_field(&mut self) {
        self.compose_field = self.compose_field.prev();
    }

    fn compose_text_mut(&mut self) -> Option<&mut String> {
        match self.compose_field {
            ComposeField::Recipient => Some(&mut self.compose.recipient),
            ComposeField::Subject => Some(&mut self.compose.subject),
            ComposeField::Date => Some(&mut self.compose.date),
            ComposeField::Time => Some(&mut self.compose.time),
            ComposeField::Body | ComposeField::Timed | ComposeField::Timezone => None,
        }
    }

    /// Typed character in the focused field
    pub fn compose_input(&mut self, c: char) {
        match self.compose_field {
            ComposeField::Timed if c == ' ' => self.toggle_timed(),
            ComposeField::Timezone if c == ' ' => self.cycle_timezone(true),
            _ => {
                if let Some(text) = self.compose_text_mut() {
                    text.push(c);
                }
            }
        }
    }

    pub fn compose_backspace(&mut self) {
        if let Some(text) = self.compose_text_mut() {
            text.pop();
        }
    }

    pub fn toggle_timed(&mut self) {
        self.compose.is_timed = !self.compose.is_timed;
    }

    /// Step through the timezone table. An unknown zone restarts at the top.
    pub fn cycle_timezone(&mut self, forward: bool) {
        let len = TIMEZONES.len();
        let next = match Timezone::index_of(&self.compose.timezone) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.compose.timezone = TIMEZONES[next].name.to_string();
    }

    pub fn set_alert(&mut self, msg: &str) {
        self.alert = Some(msg.to_string());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // Response pane

    pub fn show_response(&mut self, text: String) {
        self.response = text;
        self.response_scroll = 0;
        self.view = View::Response;
    }

    pub fn close_response(&mut self) {
        self.view = View::List;
    }

    /// Scroll down, stopping at the last line of the response
    pub fn response_scroll_down(&mut self) {
        let last = self.response.lines().count().saturating_sub(1);
        let last = u16::try_from(last).unwrap_or(u16::MAX);
        self.response_scroll = self.response_scroll.saturating_add(3).min(last);
    }

    pub fn response_scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::types::{DATE_SENT, RECIPIENT, STATUS_CODE, TIME_SENT};

    fn entry(id: &str, recipient: &str, status: &str, date: &str) -> Entry {
        Entry::new()
            .with_field("id", id)
            .with_field(RECIPIENT, recipient)
            .with_field(STATUS_CODE, status)
            .with_field(DATE_SENT, date)
            .with_field(TIME_SENT, "12:00")
    }

    fn app() -> App {
        App::new(
            vec![
                entry("1", "a@example.com", "500", "2025-01-03"),
                entry("2", "b@other.org", "200", "2025-01-01"),
                entry("3", "c@example.com", "200", "2025-01-02"),
            ],
            Arc::new(Config::default()),
            "test".to_string(),
        )
    }

    fn ids(app: &App) -> Vec<&str> {
        app.entries.iter().map(|e| e.field("id").unwrap()).collect()
    }

    fn selected_id(app: &App) -> Option<&str> {
        app.selected_entry().and_then(|e| e.field("id"))
    }

    #[test]
    fn filter_then_clear() {
        let mut app = app();
        app.start_filter();
        app.filter_input = r#"recipiant:"INCLUDES:example.com""#.to_string();
        app.apply_filter();

        assert_eq!(app.view, View::List);
        assert_eq!(app.visible, vec![true, false, true]);
        assert_eq!(app.filtered_indices, vec![0, 2]);
        assert_eq!(app.status_message.as_deref(), Some("2 of 3 shown"));

        app.clear_filter();
        assert_eq!(app.filtered_indices, vec![0, 1, 2]);
    }

    #[test]
    fn cancel_filter_keeps_applied_query() {
        let mut app = app();
        app.filter_input = r#"status_code:"200""#.to_string();
        app.apply_filter();
        app.start_filter();
        app.filter_input.push_str("garbage");
        app.cancel_filter();
        assert_eq!(app.filter_input, r#"status_code:"200""#);
        assert_eq!(app.filtered_indices, vec![1, 2]);
    }

    #[test]
    fn sort_moves_state_with_entries() {
        let mut app = app();
        app.filter_input = r#"status_code:"200""#.to_string();
        app.apply_filter();
        app.next(); // select entry 3
        app.toggle_details();
        assert_eq!(selected_id(&app), Some("3"));

        app.sort(SortKey::Oldest);
        assert_eq!(ids(&app), ["2", "3", "1"]);
        assert_eq!(app.visible, vec![true, true, false]);
        assert_eq!(app.expanded, vec![false, true, false]);
        assert_eq!(selected_id(&app), Some("3"));
        assert_eq!(app.sort_key, Some(SortKey::Oldest));
    }

    #[test]
    fn sort_menu_chooses_and_closes() {
        let mut app = app();
        app.toggle_sort_menu();
        assert_eq!(app.view, View::SortMenu);
        app.sort_menu_prev(); // wraps to Email Status
        app.choose_sort();
        assert_eq!(app.view, View::List);
        assert_eq!(ids(&app), ["2", "3", "1"]);
    }

    #[test]
    fn unknown_sort_label_is_a_no_op() {
        let mut app = app();
        app.sort_by_label("Biggest");
        assert_eq!(ids(&app), ["1", "2", "3"]);
        assert_eq!(app.sort_key, None);
        assert!(app.status_message.is_none());
    }

    #[test]
    fn sort_on_empty_list_does_nothing() {
        let mut app = App::new(Vec::new(), Arc::new(Config::default()), "empty".to_string());
        app.sort(SortKey::Newest);
        assert!(app.entries.is_empty());
        assert_eq!(app.sort_key, None);
    }

    #[test]
    fn expand_and_collapse_all() {
        let mut app = app();
        app.expand_all();
        assert!(app.expanded.iter().all(|e| *e));
        app.toggle_details();
        assert_eq!(app.expanded, vec![false, true, true]);
        app.collapse_all();
        assert!(app.expanded.iter().all(|e| !*e));
    }

    #[test]
    fn replace_entries_reapplies_filter_and_sort() {
        let mut app = app();
        app.sort(SortKey::EmailStatus);
        app.filter_input = r#"status_code:"200""#.to_string();
        app.apply_filter();

        app.replace_entries(vec![
            entry("9", "z@example.com", "200", "2025-02-01"),
            entry("8", "y@example.com", "100", "2025-02-01"),
            entry("7", "x@example.com", "200", "2025-02-01"),
        ]);
        assert_eq!(ids(&app), ["8", "9", "7"]);
        assert_eq!(app.filtered_indices, vec![1, 2]);
    }

    #[test]
    fn compose_field_editing() {
        let mut app = app();
        app.start_compose();
        assert_eq!(app.compose.timezone, "UTC");

        for c in "ops@x.io".chars() {
            app.compose_input(c);
        }
        app.compose_backspace();
        assert_eq!(app.compose.recipient, "ops@x.i");

        app.compose_field = ComposeField::Timed;
        app.compose_input(' ');
        assert!(app.compose.is_timed);

        app.compose_field = ComposeField::Timezone;
        app.cycle_timezone(false);
        assert_eq!(app.compose.timezone, TIMEZONES[TIMEZONES.len() - 1].name);
        app.cycle_timezone(true);
        assert_eq!(app.compose.timezone, "UTC");

        assert_eq!(ComposeField::Recipient.prev(), ComposeField::Timezone);
        assert_eq!(ComposeField::Timezone.next(), ComposeField::Recipient);
    }

    #[test]
    fn response_scroll_stops_at_last_line() {
        let mut app = app();
        app.show_response("HTTP 200\n\n{\n  \"ok\": true\n}".to_string());
        for _ in 0..10 {
            app.response_scroll_down();
        }
        assert_eq!(app.response_scroll, 4);
        app.response_scroll_up();
        assert_eq!(app.response_scroll, 1);

        app.show_response(String::new());
        app.response_scroll_down();
        assert_eq!(app.response_scroll, 0);
    }
}
