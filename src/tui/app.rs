use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::state::{PanelUiState, UiState, read_ui_state, write_ui_state};
use crate::io::store_io;
use crate::io::watcher::StoreWatcher;
use crate::model::{Config, Section, Workspace};
use crate::ops::aggregate;

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Section panel for the current project
    Panel,
    /// All projects
    Projects,
    /// The status palette
    Statuses,
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
    Move,
    Confirm,
}

/// What the single-line edit buffer commits to on Enter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    RenameSection { key: String },
    RekeySection { key: String },
    AddChild { parent: String },
    AddSibling { after: String },
    AddRoot,
    RenameProject { id: String },
    NewProject,
    StatusName { index: usize },
    StatusColor { index: usize, name: String },
    NewStatusName,
    NewStatusColor { name: String },
}

/// Pending destructive action awaiting y/n
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteSection { key: String },
    DeleteProject { id: String },
    DeleteStatus { index: usize },
}

/// A row in the flattened panel list. Children of collapsed sections
/// are excluded; everything the renderer needs is cloned in.
#[derive(Debug, Clone)]
pub struct FlatRow {
    pub key: String,
    pub name: String,
    pub status: String,
    pub depth: usize,
    pub child_count: usize,
    pub is_collapsed: bool,
}

/// Main application state
pub struct App {
    pub store_dir: PathBuf,
    pub ws: Workspace,
    pub config: Config,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the flattened panel rows
    pub panel_cursor: usize,
    /// Scroll offset (first visible panel row)
    pub panel_scroll: usize,
    /// Cursor for the projects view
    pub projects_cursor: usize,
    pub projects_scroll: usize,
    /// Cursor for the statuses view
    pub statuses_cursor: usize,
    pub statuses_scroll: usize,
    /// Saved panel positions for projects that are not current
    pub panels: HashMap<String, PanelUiState>,
    /// Help overlay visible
    pub show_help: bool,
    pub help_scroll: usize,
    /// Transient message for the status row
    pub status_message: Option<String>,
    pub status_is_error: bool,
    /// Edit mode: single-line buffer with a byte-offset cursor
    pub edit_buffer: String,
    pub edit_cursor: usize,
    pub edit_target: Option<EditTarget>,
    /// Move mode: key of the section picked for swapping
    pub move_source: Option<String>,
    pub confirm_action: Option<ConfirmAction>,
    /// Ignore watcher events briefly after our own writes
    suppress_reload_until: Option<Instant>,
}

impl App {
    pub fn new(store_dir: PathBuf, ws: Workspace, config: Config) -> Self {
        let theme = Theme::from_config(&config.ui);

        App {
            store_dir,
            ws,
            config,
            view: View::Panel,
            mode: Mode::Navigate,
            should_quit: false,
            theme,
            panel_cursor: 0,
            panel_scroll: 0,
            projects_cursor: 0,
            projects_scroll: 0,
            statuses_cursor: 0,
            statuses_scroll: 0,
            panels: HashMap::new(),
            show_help: false,
            help_scroll: 0,
            status_message: None,
            status_is_error: false,
            edit_buffer: String::new(),
            edit_cursor: 0,
            edit_target: None,
            move_source: None,
            confirm_action: None,
            suppress_reload_until: None,
        }
    }

    /// Build the visible panel rows: pre-order over the live tree,
    /// stopping at collapsed sections.
    pub fn flatten(&self) -> Vec<FlatRow> {
        let mut rows = Vec::new();
        for root in &self.ws.sections.roots {
            flatten_into(root, 0, &mut rows);
        }
        rows
    }

    /// Key of the section under the panel cursor
    pub fn current_key(&self) -> Option<String> {
        self.flatten().get(self.panel_cursor).map(|r| r.key.clone())
    }

    /// Keys that appear on more than one section
    pub fn duplicate_keys(&self) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut dups = HashSet::new();
        for (section, _) in self.ws.sections.iter() {
            if !seen.insert(section.key.as_str()) {
                dups.insert(section.key.clone());
            }
        }
        dups
    }

    /// Next free dotted key under a parent ("2.3" for a parent "2" with
    /// two children), bumping the trailing number past any collisions
    pub fn next_child_key(&self, parent_key: &str) -> String {
        let base = self
            .ws
            .sections
            .lookup(parent_key)
            .map_or(1, |p| p.children.len() + 1);
        let mut n = base;
        loop {
            let candidate = format!("{}.{}", parent_key, n);
            if !self.ws.sections.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Next free top-level key ("3" for a tree with two roots)
    pub fn next_root_key(&self) -> String {
        let mut n = self.ws.sections.roots.len() + 1;
        loop {
            let candidate = n.to_string();
            if !self.ws.sections.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Aggregate, sync the current project, and persist under the store
    /// lock. Every tree or palette mutation funnels through here.
    pub fn commit(&mut self) {
        aggregate::aggregate(&mut self.ws.sections, &self.ws.statuses);
        self.ws.sync_current();
        self.save();
    }

    /// Persist the workspace without re-aggregating (project metadata edits)
    pub fn save(&mut self) {
        self.ws.bump_generation();
        let result = StoreLock::acquire_default(&self.store_dir)
            .map_err(|e| e.to_string())
            .and_then(|_lock| {
                store_io::write_workspace(&self.store_dir, &self.ws).map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => {
                self.suppress_reload_until = Some(Instant::now() + Duration::from_millis(500));
            }
            Err(e) => {
                self.status_message = Some(format!("save failed: {}", e));
                self.status_is_error = true;
            }
        }
    }

    /// Reload the workspace after an external write. Skipped while an
    /// edit, move, or confirmation is in flight, and briefly after our
    /// own saves.
    pub fn maybe_reload(&mut self) {
        if self.mode != Mode::Navigate {
            return;
        }
        if let Some(until) = self.suppress_reload_until
            && Instant::now() < until
        {
            return;
        }
        self.ws = store_io::read_workspace(&self.store_dir);
        self.clamp_panel_cursor();
        self.status_message = Some("store changed on disk, reloaded".to_string());
        self.status_is_error = false;
    }

    pub fn clamp_panel_cursor(&mut self) {
        let len = self.flatten().len();
        if len == 0 {
            self.panel_cursor = 0;
        } else if self.panel_cursor >= len {
            self.panel_cursor = len - 1;
        }
    }

    /// Stash the live panel position into the per-project map
    pub fn stash_panel_state(&mut self) {
        if let Some(id) = self.ws.current_project_id.clone() {
            self.panels.insert(
                id,
                PanelUiState {
                    cursor: self.panel_cursor,
                    scroll_offset: self.panel_scroll,
                },
            );
        }
    }

    /// Restore the panel position for the (new) current project
    pub fn restore_panel_state(&mut self) {
        let state = self
            .ws
            .current_project_id
            .as_ref()
            .and_then(|id| self.panels.get(id))
            .cloned()
            .unwrap_or_default();
        self.panel_cursor = state.cursor;
        self.panel_scroll = state.scroll_offset;
        self.clamp_panel_cursor();
    }
}

fn flatten_into(section: &Section, depth: usize, rows: &mut Vec<FlatRow>) {
    rows.push(FlatRow {
        key: section.key.clone(),
        name: section.name.clone(),
        status: section.status.clone(),
        depth,
        child_count: section.children.len(),
        is_collapsed: section.is_collapsed,
    });
    if !section.is_collapsed {
        for child in &section.children {
            flatten_into(child, depth + 1, rows);
        }
    }
}

/// Restore UI state from .state.json
pub fn restore_ui_state(app: &mut App) {
    let ui_state = match read_ui_state(&app.store_dir) {
        Some(s) => s,
        None => return,
    };

    match ui_state.view.as_str() {
        "projects" => app.view = View::Projects,
        "statuses" => app.view = View::Statuses,
        _ => app.view = View::Panel,
    }

    app.panels = ui_state.panels;
    app.restore_panel_state();
}

/// Save UI state to .state.json
pub fn save_ui_state(app: &App) {
    let view = match app.view {
        View::Panel => "panel",
        View::Projects => "projects",
        View::Statuses => "statuses",
    };

    let mut panels = app.panels.clone();
    if let Some(id) = app.ws.current_project_id.clone() {
        panels.insert(
            id,
            PanelUiState {
                cursor: app.panel_cursor,
                scroll_offset: app.panel_scroll,
            },
        );
    }

    let _ = write_ui_state(
        &app.store_dir,
        &UiState {
            view: view.to_string(),
            panels,
        },
    );
}

/// Run the TUI application
pub fn run(store: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let store_dir = match store {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            std::fs::canonicalize(dir)?
        }
        None => store_io::store_dir(),
    };
    let (config, _) = config_io::read_config(&store_dir)?;
    let ws = store_io::read_workspace(&store_dir);

    let mut app = App::new(store_dir, ws, config);

    // Restore saved UI state
    restore_ui_state(&mut app);

    // Watch for writes from other processes; reload on events
    let watcher = StoreWatcher::start(&app.store_dir).ok();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Save UI state before exit
    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&StoreWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut save_counter = 0u32;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            // Debounced state save: every ~5 key presses
            save_counter += 1;
            if save_counter >= 5 {
                save_ui_state(app);
                save_counter = 0;
            }
        }

        if let Some(w) = watcher
            && !w.poll().is_empty()
        {
            app.maybe_reload();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::SectionTree;

    fn section(key: &str, name: &str, children: Vec<Section>) -> Section {
        let mut s = Section::new(key, name);
        s.children = children;
        s
    }

    fn test_app(tree: SectionTree) -> App {
        let mut ws = Workspace::new();
        ws.sections = tree;
        App::new(PathBuf::from("/tmp/canopy-test"), ws, Config::default())
    }

    #[test]
    fn test_flatten_skips_collapsed_children() {
        let mut parent = section(
            "1",
            "Top",
            vec![section("1.1", "A", vec![]), section("1.2", "B", vec![])],
        );
        parent.is_collapsed = true;
        let tree = SectionTree::from_roots(vec![parent, section("2", "Other", vec![])]);
        let app = test_app(tree);

        let rows = app.flatten();
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert!(rows[0].is_collapsed);
        assert_eq!(rows[0].child_count, 2);
    }

    #[test]
    fn test_flatten_depths() {
        let tree = SectionTree::from_roots(vec![section(
            "1",
            "Top",
            vec![section("1.1", "A", vec![section("1.1.1", "Deep", vec![])])],
        )]);
        let app = test_app(tree);

        let depths: Vec<usize> = app.flatten().iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn test_next_child_key_skips_collisions() {
        let tree = SectionTree::from_roots(vec![section(
            "1",
            "Top",
            vec![section("1.1", "A", vec![]), section("1.3", "C", vec![])],
        )]);
        let app = test_app(tree);

        // Two children suggest 1.3, which exists; 1.4 is free
        assert_eq!(app.next_child_key("1"), "1.4");
    }

    #[test]
    fn test_next_root_key() {
        let tree =
            SectionTree::from_roots(vec![section("1", "A", vec![]), section("2", "B", vec![])]);
        let app = test_app(tree);
        assert_eq!(app.next_root_key(), "3");

        let empty = test_app(SectionTree::new());
        assert_eq!(empty.next_root_key(), "1");
    }

    #[test]
    fn test_duplicate_keys() {
        let tree = SectionTree::from_roots(vec![
            section("1", "A", vec![section("x", "Inner", vec![])]),
            section("x", "Outer", vec![]),
        ]);
        let app = test_app(tree);

        let dups = app.duplicate_keys();
        assert!(dups.contains("x"));
        assert!(!dups.contains("1"));
    }
}
