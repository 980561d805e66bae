use crate::catalog::filter::{self, FilterCriteria, SearchScope};
use crate::catalog::Scent;
use crate::commands::AppCommand;
use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use std::str::FromStr;
use tokio::sync::mpsc;

/// Statuses the sheet's controlled vocabulary uses, in cycle order.
pub const STATUS_CHOICES: [&str; 3] = ["Active", "Test", "Archived"];

#[derive(PartialEq, Debug, Clone)]
pub enum ViewMode {
    Catalog,
    Detail,
    Families,
}

#[derive(PartialEq, Debug, Clone)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(PartialEq, Debug, Clone)]
pub enum FocusArea {
    Menu,
    MainView,
}

#[derive(Debug)]
pub enum AppEvent {
    Message(String),
    Error(String),
    Loading,
    Scents(Vec<Scent>),
}

pub struct App {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub focus_area: FocusArea,
    pub menu_selected_index: usize,
    /// Full dataset from the last successful ingestion.
    pub scents_all: Vec<Scent>,
    /// Current filtered view, original order preserved.
    pub scent_list: Vec<Scent>,
    /// Family facet list: "All" plus the distinct families in the dataset.
    pub families: Vec<String>,
    pub criteria: FilterCriteria,
    pub selected_index: usize,
    pub scent_list_state: ListState,
    pub detail_scroll: u16,
    pub loading: bool,
    pub error: Option<String>,
    pub command_input: String,
    pub command_cursor: usize,
    pub command_history: Vec<String>,
    pub command_history_index: Option<usize>,
    pub log_messages: Vec<String>,
    pub cmd_tx: mpsc::UnboundedSender<AppCommand>,
    pub evt_rx: Option<mpsc::UnboundedReceiver<AppEvent>>, // taken by the run loop
}

impl App {
    pub fn new(
        startup_info: Vec<String>,
        cmd_tx: mpsc::UnboundedSender<AppCommand>,
        evt_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> App {
        let mut log_messages = vec!["Application started".to_string()];
        log_messages.extend(startup_info);

        App {
            view_mode: ViewMode::Catalog,
            input_mode: InputMode::Normal,
            focus_area: FocusArea::Menu,
            menu_selected_index: 0,
            scents_all: Vec::new(),
            scent_list: Vec::new(),
            families: vec![filter::ALL_FAMILIES.to_string()],
            criteria: FilterCriteria::default(),
            selected_index: 0,
            scent_list_state: {
                let mut s = ListState::default();
                s.select(Some(0));
                s
            },
            detail_scroll: 0,
            loading: false,
            error: None,
            command_input: String::new(),
            command_cursor: 0,
            command_history: Vec::new(),
            command_history_index: None,
            log_messages,
            cmd_tx,
            evt_rx: Some(evt_rx),
        }
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    /// Replace the dataset wholesale after a successful ingestion and
    /// recompute the facet list plus the filtered view.
    pub fn set_dataset(&mut self, scents: Vec<Scent>) {
        self.families = filter::family_facets(&scents);
        self.scents_all = scents;
        self.loading = false;
        self.error = None;
        // A family selected against the previous dataset may be gone.
        if let Some(family) = &self.criteria.family {
            if !self.families.iter().any(|f| f == family) {
                self.criteria.family = None;
            }
        }
        self.apply_filters();
    }

    pub fn set_error(&mut self, msg: String) {
        self.loading = false;
        self.error = Some(msg.clone());
        self.add_log(format!("✗ {}", msg));
    }

    pub fn apply_filters(&mut self) {
        self.scent_list = filter::apply_filters(&self.scents_all, &self.criteria);
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        if self.selected_index >= self.scent_list.len() {
            self.selected_index = self.scent_list.len().saturating_sub(1);
        }
        self.scent_list_state.select(Some(self.selected_index));
    }

    pub fn selected_scent(&self) -> Option<&Scent> {
        self.scent_list.get(self.selected_index)
    }

    pub fn cycle_status_filter(&mut self) {
        self.criteria.status = match self.criteria.status.as_deref() {
            None => Some("Active".to_string()),
            Some("Active") => Some("Test".to_string()),
            Some("Test") => Some("Archived".to_string()),
            _ => None,
        };
        self.apply_filters();
    }

    pub fn cycle_search_scope(&mut self) {
        self.criteria.scope = self.criteria.scope.cycle();
        self.apply_filters();
    }

    fn request_refresh(&mut self) {
        let _ = self.cmd_tx.send(AppCommand::Refresh);
    }

    /// Ghost-text suggestion for the command line.
    pub fn get_completion_hint(&self) -> Option<String> {
        let commands = vec![
            "refresh", "filter", "family", "status", "scope", "help", "quit",
        ];
        let input = self.command_input.trim_start();

        if input.is_empty() {
            return None;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        if parts.len() == 1 && !input.ends_with(' ') {
            for cmd in commands {
                if cmd.starts_with(parts[0]) && cmd != parts[0] {
                    return Some(cmd[parts[0].len()..].to_string());
                }
            }
            return None;
        }

        let cur = parts.get(1).copied().unwrap_or("");
        match parts[0] {
            "scope" => {
                for s in ["any", "top", "heart", "base"] {
                    if s.starts_with(cur) && s != cur {
                        return Some(s[cur.len()..].to_string());
                    }
                }
                None
            }
            "status" => {
                for s in STATUS_CHOICES.iter().copied().chain(std::iter::once("Any")) {
                    if s.starts_with(cur) && s != cur {
                        return Some(s[cur.len()..].to_string());
                    }
                }
                None
            }
            "family" => {
                for f in &self.families {
                    if f.starts_with(cur) && f != cur {
                        return Some(f[cur.len()..].to_string());
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Filter commands mutate criteria locally; everything else goes to the
    /// background actor. Returns true when the edit changed something.
    fn handle_local_command(&mut self, cmd: &str) -> bool {
        let mut parts = cmd.splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or("");
        let args = parts.next().unwrap_or("").trim();
        match head {
            "filter" => {
                if args.is_empty() || args == "clear" || args == "--clear" {
                    self.criteria.query.clear();
                } else {
                    self.criteria.query = args.to_string();
                }
                self.apply_filters();
                true
            }
            "family" => {
                self.criteria.family = if args.is_empty() || args.eq_ignore_ascii_case("all") {
                    None
                } else {
                    Some(args.to_string())
                };
                self.apply_filters();
                true
            }
            "status" => {
                self.criteria.status = if args.is_empty() || args.eq_ignore_ascii_case("any") {
                    None
                } else {
                    Some(args.to_string())
                };
                self.apply_filters();
                true
            }
            "scope" => {
                match args.parse::<SearchScope>() {
                    Ok(scope) => {
                        self.criteria.scope = scope;
                        self.apply_filters();
                    }
                    Err(()) => {
                        self.add_log(format!("Usage: scope any|top|heart|base (got \"{}\")", args));
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Byte offset of the character left of the cursor. The cursor is a byte
    /// index but must always land on a char boundary, so edits step over
    /// whole characters rather than single bytes.
    fn prev_char_boundary(&self) -> Option<usize> {
        self.command_input[..self.command_cursor]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
    }

    pub fn handle_key_event(&mut self, key: KeyCode) -> bool {
        if self.input_mode == InputMode::Command {
            match key {
                KeyCode::Enter => {
                    let cmd_owned = self.command_input.trim().to_string();
                    self.command_input.clear();
                    self.command_cursor = 0;
                    self.input_mode = InputMode::Normal;
                    if cmd_owned.is_empty() || cmd_owned == "q" {
                        return false;
                    }

                    if self.handle_local_command(&cmd_owned) {
                        self.command_history.push(cmd_owned);
                        self.command_history_index = None;
                        return false;
                    }

                    if let Ok(app_cmd) = AppCommand::from_str(&cmd_owned) {
                        if app_cmd == AppCommand::Quit {
                            return true;
                        }
                        let _ = self.cmd_tx.send(app_cmd);
                    } else {
                        // Should technically not happen with my parser implementation
                        // but good to be safe
                        let _ = self.cmd_tx.send(AppCommand::Unknown(cmd_owned.clone()));
                    }
                    self.command_history.push(cmd_owned);
                    self.command_history_index = None;
                    return false;
                }
                KeyCode::Esc => {
                    self.command_input.clear();
                    self.command_cursor = 0;
                    self.input_mode = InputMode::Normal;
                    return false;
                }
                KeyCode::Tab => {
                    if let Some(hint) = self.get_completion_hint() {
                        let insert = format!("{} ", hint);
                        self.command_input.insert_str(self.command_cursor, &insert);
                        self.command_cursor += insert.len();
                    }
                    return false;
                }
                KeyCode::Up => {
                    if self.command_history.is_empty() {
                        return false;
                    }
                    let next = match self.command_history_index {
                        None => self.command_history.len().saturating_sub(1),
                        Some(i) => i.saturating_sub(1),
                    };
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Down => {
                    if self.command_history.is_empty() {
                        return false;
                    }
                    let next = match self.command_history_index {
                        None => return false,
                        Some(i) => {
                            let n = i + 1;
                            if n >= self.command_history.len() {
                                self.command_history_index = None;
                                self.command_input.clear();
                                self.command_cursor = 0;
                                return false;
                            }
                            n
                        }
                    };
                    self.command_history_index = Some(next);
                    if let Some(cmd) = self.command_history.get(next) {
                        self.command_input = cmd.clone();
                        self.command_cursor = self.command_input.len();
                    }
                    return false;
                }
                KeyCode::Backspace => {
                    if let Some(idx) = self.prev_char_boundary() {
                        self.command_input.remove(idx);
                        self.command_cursor = idx;
                    }
                    return false;
                }
                KeyCode::Delete => {
                    if self.command_cursor < self.command_input.len() {
                        self.command_input.remove(self.command_cursor);
                    }
                    return false;
                }
                KeyCode::Left => {
                    if let Some(idx) = self.prev_char_boundary() {
                        self.command_cursor = idx;
                    }
                    return false;
                }
                KeyCode::Right => {
                    if let Some(c) = self.command_input[self.command_cursor..].chars().next() {
                        self.command_cursor += c.len_utf8();
                    }
                    return false;
                }
                KeyCode::Home => {
                    self.command_cursor = 0;
                    return false;
                }
                KeyCode::End => {
                    self.command_cursor = self.command_input.len();
                    return false;
                }
                KeyCode::Char(c) => {
                    self.command_input.insert(self.command_cursor, c);
                    self.command_cursor += c.len_utf8();
                    return false;
                }
                _ => return false,
            }
        }

        match key {
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Command;
                self.command_input.clear();
                self.command_cursor = 0;
                false
            }
            KeyCode::Char('q') => true,
            KeyCode::Char('r') => {
                self.request_refresh();
                false
            }
            KeyCode::Char('f') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Catalog {
                    self.cycle_status_filter();
                }
                false
            }
            KeyCode::Char('s') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Catalog {
                    self.cycle_search_scope();
                }
                false
            }
            KeyCode::Left => {
                self.focus_area = FocusArea::Menu;
                false
            }
            KeyCode::Right => {
                self.focus_area = FocusArea::MainView;
                false
            }
            KeyCode::Up => {
                if self.focus_area == FocusArea::Menu {
                    if self.menu_selected_index > 0 {
                        self.menu_selected_index -= 1;
                    }
                } else if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
                false
            }
            KeyCode::Down => {
                if self.focus_area == FocusArea::Menu {
                    let menu_items_count = 3;
                    if self.menu_selected_index < menu_items_count - 1 {
                        self.menu_selected_index += 1;
                    }
                } else if self.view_mode == ViewMode::Detail {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else if self.selected_index < self.scent_list.len().saturating_sub(1) {
                    self.selected_index += 1;
                }
                false
            }
            KeyCode::Enter | KeyCode::Char('c') => {
                if self.focus_area == FocusArea::Menu {
                    match self.menu_selected_index {
                        0 => self.view_mode = ViewMode::Catalog,
                        1 => {
                            self.view_mode = ViewMode::Detail;
                            self.detail_scroll = 0;
                        }
                        2 => self.view_mode = ViewMode::Families,
                        _ => {}
                    }
                    self.focus_area = FocusArea::MainView;
                } else if self.view_mode == ViewMode::Catalog && !self.scent_list.is_empty() {
                    self.view_mode = ViewMode::Detail;
                    self.menu_selected_index = 1;
                    self.detail_scroll = 0;
                }
                false
            }
            KeyCode::Char('x') => {
                if self.focus_area == FocusArea::MainView && self.view_mode == ViewMode::Detail {
                    self.view_mode = ViewMode::Catalog;
                    self.menu_selected_index = 0;
                }
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        App::new(Vec::new(), cmd_tx, evt_rx)
    }

    fn dataset() -> Vec<Scent> {
        vec![
            Scent {
                name: "Velvet".into(),
                family: "Ciprée".into(),
                status: "Active".into(),
                top_notes: "bergamot".into(),
                ..Default::default()
            },
            Scent {
                name: "Marine".into(),
                family: "Fresh".into(),
                status: "Test".into(),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn set_dataset_clears_error_and_rebuilds_facets() {
        let mut app = test_app();
        app.error = Some("Fetch failed: 502".into());
        app.set_dataset(dataset());
        assert!(app.error.is_none());
        assert_eq!(app.families, vec!["All", "Ciprée", "Fresh"]);
        assert_eq!(app.scent_list.len(), 2);
    }

    #[test]
    fn stale_family_selection_is_dropped_on_reload() {
        let mut app = test_app();
        app.criteria.family = Some("Oriental".into());
        app.set_dataset(dataset());
        assert_eq!(app.criteria.family, None);
    }

    #[test]
    fn local_filter_command_updates_query() {
        let mut app = test_app();
        app.set_dataset(dataset());
        assert!(app.handle_local_command("filter bergamot"));
        assert_eq!(app.criteria.query, "bergamot");
        assert_eq!(app.scent_list.len(), 1);
        assert!(app.handle_local_command("filter clear"));
        assert_eq!(app.scent_list.len(), 2);
    }

    #[test]
    fn family_and_status_commands_accept_sentinels() {
        let mut app = test_app();
        app.set_dataset(dataset());
        assert!(app.handle_local_command("family Fresh"));
        assert_eq!(app.criteria.family.as_deref(), Some("Fresh"));
        assert!(app.handle_local_command("family all"));
        assert_eq!(app.criteria.family, None);
        assert!(app.handle_local_command("status Test"));
        assert_eq!(app.scent_list.len(), 1);
        assert!(app.handle_local_command("status any"));
        assert_eq!(app.scent_list.len(), 2);
    }

    #[test]
    fn scope_command_parses_and_rejects() {
        let mut app = test_app();
        assert!(app.handle_local_command("scope top"));
        assert_eq!(app.criteria.scope, SearchScope::Top);
        assert!(app.handle_local_command("scope middle"));
        assert_eq!(app.criteria.scope, SearchScope::Top); // unchanged
    }

    #[test]
    fn status_cycle_wraps_back_to_any() {
        let mut app = test_app();
        app.set_dataset(dataset());
        app.cycle_status_filter();
        assert_eq!(app.criteria.status.as_deref(), Some("Active"));
        app.cycle_status_filter();
        app.cycle_status_filter();
        assert_eq!(app.criteria.status.as_deref(), Some("Archived"));
        app.cycle_status_filter();
        assert_eq!(app.criteria.status, None);
    }

    #[test]
    fn selection_clamps_when_filter_shrinks_list() {
        let mut app = test_app();
        app.set_dataset(dataset());
        app.selected_index = 1;
        assert!(app.handle_local_command("filter bergamot"));
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn command_editing_steps_over_multibyte_chars() {
        let mut app = test_app();
        app.set_dataset(dataset());
        app.handle_key_event(KeyCode::Char('/'));
        for c in "filter cipré".chars() {
            app.handle_key_event(KeyCode::Char(c));
        }
        // The cursor sits one byte past 'é' here; appending must not split it.
        app.handle_key_event(KeyCode::Char('e'));
        assert_eq!(app.command_input, "filter ciprée");
        assert_eq!(app.command_cursor, app.command_input.len());

        // Backspace and Left both retreat by a whole character.
        app.handle_key_event(KeyCode::Backspace);
        app.handle_key_event(KeyCode::Backspace);
        assert_eq!(app.command_input, "filter cipr");
        app.handle_key_event(KeyCode::Char('é'));
        app.handle_key_event(KeyCode::Left);
        app.handle_key_event(KeyCode::Delete);
        assert_eq!(app.command_input, "filter cipr");
        app.handle_key_event(KeyCode::Char('é'));
        app.handle_key_event(KeyCode::Char('e'));

        app.handle_key_event(KeyCode::Enter);
        assert_eq!(app.criteria.query, "ciprée");
        assert_eq!(app.scent_list.len(), 1);
    }

    #[test]
    fn local_commands_require_exact_first_token() {
        let mut app = test_app();
        app.set_dataset(dataset());
        assert!(!app.handle_local_command("filterx"));
        assert!(!app.handle_local_command("statusTest"));
        assert_eq!(app.criteria.query, "");
        assert_eq!(app.criteria.status, None);
        assert_eq!(app.scent_list.len(), 2);
    }

    #[test]
    fn completion_hints_cover_subcommands() {
        let mut app = test_app();
        app.set_dataset(dataset());
        app.command_input = "ref".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("resh"));
        app.command_input = "scope he".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("art"));
        app.command_input = "family Fre".into();
        assert_eq!(app.get_completion_hint().as_deref(), Some("sh"));
    }
}
