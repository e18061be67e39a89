use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;

use pathtree::error::Result;
use pathtree::panel::Panel;
use pathtree::source::{self, WalkOptions};
use pathtree::tree::{row_prefix, ClickModifiers, PathEntry};

use crate::watcher::WatchTarget;

/// Where a panel's entries come from.
#[derive(Debug, Clone)]
pub enum PanelSource {
    /// Every file under a directory.
    Walk { root: PathBuf, options: WalkOptions },
    /// A `git status --porcelain` style listing on disk.
    StatusFile(PathBuf),
}

impl PanelSource {
    pub fn load(&self) -> Result<Vec<PathEntry>> {
        match self {
            PanelSource::Walk { root, options } => source::walk_dir(root, options),
            PanelSource::StatusFile(path) => source::load_status_file(path),
        }
    }

    pub fn watch_target(&self) -> WatchTarget {
        match self {
            PanelSource::Walk { root, .. } => WatchTarget::Dir(root.clone()),
            PanelSource::StatusFile(path) => WatchTarget::File(path.clone()),
        }
    }

    /// Short human-readable origin, shown in the status bar.
    pub fn describe(&self) -> String {
        match self {
            PanelSource::Walk { root, .. } => root.display().to_string(),
            PanelSource::StatusFile(path) => path.display().to_string(),
        }
    }
}

/// A panel plus the source it reloads from.
pub struct PanelView {
    pub panel: Panel,
    pub source: PanelSource,
}

/// Application mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    #[default]
    Normal,
    /// Typing into the search bar; each keystroke re-filters the focused panel.
    Search,
    Help,
}

/// Text input state for the search bar.
#[derive(Debug, Default)]
pub struct SearchInput {
    pub input: String,
    pub cursor_position: usize,
}

/// Main application state.
pub struct App {
    pub panels: Vec<PanelView>,
    pub focused: usize,
    pub mode: AppMode,
    pub search: SearchInput,
    pub help_scroll: usize,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    pub watcher_active: bool,
    /// Inner area of the tree widget from the last draw, for mouse hit-testing.
    pub tree_area: Rect,
}

impl App {
    /// Create the app and load every panel from its source.
    pub fn new(sources: Vec<(String, PanelSource)>) -> Result<Self> {
        let mut panels = Vec::with_capacity(sources.len());
        for (title, source) in sources {
            let mut panel = Panel::new(title);
            panel.set_entries(source.load()?);
            panels.push(PanelView { panel, source });
        }
        Ok(Self {
            panels,
            focused: 0,
            mode: AppMode::Normal,
            search: SearchInput::default(),
            help_scroll: 0,
            should_quit: false,
            status_message: None,
            watcher_active: true,
            tree_area: Rect::default(),
        })
    }

    pub fn panel(&self) -> &Panel {
        &self.panels[self.focused].panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panels[self.focused].panel
    }

    /// Focus the next panel, wrapping around.
    pub fn next_panel(&mut self) {
        if !self.panels.is_empty() {
            self.focused = (self.focused + 1) % self.panels.len();
        }
    }

    // ── Sources ─────────────────────────────────────────────────────────────

    /// Reload one panel from its source. Failures leave the old entries in
    /// place and surface in the status bar.
    pub fn reload(&mut self, index: usize) {
        let Some(view) = self.panels.get_mut(index) else {
            return;
        };
        match view.source.load() {
            Ok(entries) => {
                tracing::info!(
                    panel = view.panel.title(),
                    entries = entries.len(),
                    "panel reloaded"
                );
                view.panel.set_entries(entries);
            }
            Err(e) => {
                tracing::warn!(panel = view.panel.title(), error = %e, "reload failed");
                let msg = format!("Reload of {} failed: {}", view.panel.title(), e);
                self.set_status_message(msg);
            }
        }
    }

    pub fn reload_all(&mut self) {
        for index in 0..self.panels.len() {
            self.reload(index);
        }
        self.set_status_message("Reloaded".to_string());
    }

    /// A watcher saw the source of panel `index` change.
    pub fn handle_source_changed(&mut self, index: usize) {
        if self.watcher_active {
            self.reload(index);
        }
    }

    // ── Search ──────────────────────────────────────────────────────────────

    /// Enter search mode, editing the focused panel's current query.
    pub fn start_search(&mut self) {
        let query = self.panel().query().to_string();
        self.search.cursor_position = query.len();
        self.search.input = query;
        self.mode = AppMode::Search;
    }

    /// Leave search mode keeping the query.
    pub fn confirm_search(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Leave search mode and clear the query.
    pub fn cancel_search(&mut self) {
        self.search = SearchInput::default();
        self.panel_mut().set_query("");
        self.mode = AppMode::Normal;
    }

    /// Insert a character at the current cursor position.
    pub fn search_input_char(&mut self, c: char) {
        self.search.input.insert(self.search.cursor_position, c);
        self.search.cursor_position += c.len_utf8();
        self.apply_search();
    }

    /// Delete the character before the cursor (backspace).
    pub fn search_delete_char(&mut self) {
        let Some(prev_char) = self.search.input[..self.search.cursor_position]
            .chars()
            .next_back()
        else {
            return;
        };
        self.search.cursor_position -= prev_char.len_utf8();
        self.search.input.remove(self.search.cursor_position);
        self.apply_search();
    }

    /// Move cursor left by one character.
    pub fn search_cursor_left(&mut self) {
        if let Some(prev_char) = self.search.input[..self.search.cursor_position]
            .chars()
            .next_back()
        {
            self.search.cursor_position -= prev_char.len_utf8();
        }
    }

    /// Move cursor right by one character.
    pub fn search_cursor_right(&mut self) {
        if let Some(next_char) = self.search.input[self.search.cursor_position..]
            .chars()
            .next()
        {
            self.search.cursor_position += next_char.len_utf8();
        }
    }

    fn apply_search(&mut self) {
        let query = self.search.input.clone();
        self.panel_mut().set_query(&query);
    }

    // ── Mouse ───────────────────────────────────────────────────────────────

    /// Resolve a left click at terminal cell (`column`, `row`).
    ///
    /// Rows map to panel rows through the scroll offset. Empty canvas below the
    /// last row clears the selection; a plain click on a folder's indicator
    /// toggles the folder instead of selecting it.
    pub fn click_at(&mut self, column: u16, row: u16, modifiers: ClickModifiers) {
        let area = self.tree_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return;
        }

        let panel = &mut self.panels[self.focused].panel;
        let index = panel.scroll_offset + (row - area.y) as usize;
        let Some(hit) = panel.rows().get(index) else {
            panel.click_outside();
            return;
        };

        if hit.is_folder && modifiers == ClickModifiers::PLAIN {
            let indicator = row_prefix(panel.rows(), index).chars().count() as u16;
            let offset = column - area.x;
            if offset == indicator || offset == indicator + 1 {
                let path = hit.path.clone();
                panel.toggle_folder(&path);
                return;
            }
        }
        panel.click_row(index, modifiers);
    }

    // ── Misc ────────────────────────────────────────────────────────────────

    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == AppMode::Help {
            AppMode::Normal
        } else {
            self.help_scroll = 0;
            AppMode::Help
        };
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
