//! One tree panel: the render-cycle pipeline plus the state it owns.
//!
//! Data flows entries → filter → build → aggregate → expansion → rows. Built
//! trees are memoized on (entry generation, trimmed query); the row list is
//! rebuilt whenever expansion changes. Every piece of state here belongs to a
//! single panel, so a file panel and a changes panel never interfere.

use std::collections::HashSet;

use crate::tree::{
    aggregate, build, filter, leaf_status_map, node_paths, normalize, visible_rows, BuiltTree,
    ClickModifiers, ExpansionState, Mode, PathEntry, SelectionController, SelectionState,
    StatusMap, VisibleRow,
};

pub struct Panel {
    title: String,
    paths: Vec<String>,
    leaf_status: StatusMap,
    generation: u64,
    query: String,
    full: BuiltTree,
    filtered: Option<BuiltTree>,
    folder_status: StatusMap,
    memo_key: Option<(u64, String)>,
    tree_builds: usize,
    expansion: ExpansionState,
    selection: SelectionController,
    rows: Vec<VisibleRow>,
    order: Vec<String>,
    pub cursor: usize,
    pub scroll_offset: usize,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paths: Vec::new(),
            leaf_status: StatusMap::new(),
            generation: 0,
            query: String::new(),
            full: BuiltTree::default(),
            filtered: None,
            folder_status: StatusMap::new(),
            memo_key: None,
            tree_builds: 0,
            expansion: ExpansionState::new(),
            selection: SelectionController::new(),
            rows: Vec::new(),
            order: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the panel's data set.
    ///
    /// Expansion and selection entries for vanished paths are pruned. Paths
    /// that still exist keep their state even while hidden.
    pub fn set_entries(&mut self, entries: Vec<PathEntry>) {
        let mut seen = HashSet::new();
        self.paths = entries
            .iter()
            .filter_map(|entry| normalize(&entry.path))
            .filter(|path| seen.insert(path.clone()))
            .collect();
        self.leaf_status = leaf_status_map(&entries);
        self.generation += 1;

        self.full = build(&self.paths);
        self.tree_builds += 1;
        self.expansion.reconcile(&self.full.folder_paths);
        let known: HashSet<&str> = self.paths.iter().map(String::as_str).collect();
        let folders = &self.full.folder_paths;
        self.selection.retain_existing(|path| known.contains(path) || folders.contains(path));
        tracing::debug!(
            panel = %self.title,
            paths = self.paths.len(),
            folders = self.full.folder_paths.len(),
            "panel entries replaced"
        );
        self.refresh();
    }

    /// Set the search query. Returns `false` if it did not change.
    pub fn set_query(&mut self, query: &str) -> bool {
        if self.query == query {
            return false;
        }
        let before = self.mode();
        self.query = query.to_string();
        let after = self.mode();
        if before != after {
            tracing::info!(panel = %self.title, mode = ?after, "search mode changed");
        }
        self.refresh();
        true
    }

    /// Recompute the tree (if the memo key changed) and the visible rows.
    pub fn refresh(&mut self) {
        let key = (self.generation, self.query.trim().to_string());
        if self.memo_key.as_ref() != Some(&key) {
            self.filtered = if filter::is_active(&self.query) {
                self.tree_builds += 1;
                Some(build(filter::filter(&self.paths, &self.query).iter()))
            } else {
                None
            };
            let folder_status = aggregate(&self.tree().nodes, &self.leaf_status);
            self.folder_status = folder_status;
            self.memo_key = Some(key);
        }
        self.rebuild_rows();
    }

    fn rebuild_rows(&mut self) {
        let focused = self.order.get(self.cursor).cloned();

        let query = self.query.as_str();
        let expansion = &self.expansion;
        let tree = self.filtered.as_ref().unwrap_or(&self.full);
        self.rows = visible_rows(&tree.nodes, &self.folder_status, &self.leaf_status, |path| {
            expansion.is_expanded(path, query)
        });
        self.order = self.rows.iter().map(|row| row.path.clone()).collect();

        if let Some(idx) = focused.and_then(|path| self.order.iter().position(|p| *p == path)) {
            self.cursor = idx;
        } else if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[VisibleRow] {
        &self.rows
    }

    /// Depth-first paths of the visible rows; the index space for range selection.
    pub fn visible_order(&self) -> &[String] {
        &self.order
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> Mode {
        self.expansion.mode(&self.query)
    }

    pub fn is_searching(&self) -> bool {
        self.mode() == Mode::Searching
    }

    /// The tree currently displayed (filtered while searching).
    pub fn tree(&self) -> &BuiltTree {
        self.filtered.as_ref().unwrap_or(&self.full)
    }

    pub fn folder_status(&self) -> &StatusMap {
        &self.folder_status
    }

    pub fn leaf_status(&self) -> &StatusMap {
        &self.leaf_status
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selection.is_selected(path)
    }

    /// Selected paths in tree order, for bulk-action collaborators. Rows
    /// hidden by a collapsed folder or a query are included.
    pub fn selected_paths(&self) -> Vec<String> {
        self.selection.selected_in_order(node_paths(&self.full.nodes))
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn cursor_row(&self) -> Option<&VisibleRow> {
        self.rows.get(self.cursor)
    }

    // ── Expansion ───────────────────────────────────────────────────────────

    /// Flip one folder. Ignored while searching, when every folder is
    /// force-expanded and the manual set must stay as it was.
    pub fn toggle_folder(&mut self, path: &str) -> bool {
        if self.is_searching() {
            return false;
        }
        let changed = self.expansion.toggle(path);
        if changed {
            self.rebuild_rows();
        }
        changed
    }

    pub fn expand_all(&mut self) -> bool {
        self.set_all_expanded(true)
    }

    pub fn collapse_all(&mut self) -> bool {
        self.set_all_expanded(false)
    }

    fn set_all_expanded(&mut self, expanded: bool) -> bool {
        if self.is_searching() {
            return false;
        }
        self.expansion.toggle_all(&self.full.folder_paths, expanded);
        self.rebuild_rows();
        true
    }

    /// Toggle the folder under the cursor. Returns `false` on files.
    pub fn activate_cursor(&mut self) -> bool {
        match self.cursor_row() {
            Some(row) if row.is_folder => {
                let path = row.path.clone();
                self.toggle_folder(&path)
            }
            _ => false,
        }
    }

    /// Collapse the folder under the cursor, or move the cursor to the parent row.
    pub fn collapse_or_parent(&mut self) {
        let Some(row) = self.cursor_row() else {
            return;
        };
        if row.is_folder && row.is_expanded && !self.is_searching() {
            let path = row.path.clone();
            self.toggle_folder(&path);
            return;
        }
        if let Some((parent, _)) = row.path.rsplit_once('/') {
            if let Some(idx) = self.order.iter().position(|p| p == parent) {
                self.cursor = idx;
            }
        }
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Resolve a click on `path`. The cursor follows the clicked row.
    pub fn click(&mut self, path: &str, modifiers: ClickModifiers) -> &SelectionState {
        if let Some(idx) = self.order.iter().position(|p| p == path) {
            self.cursor = idx;
        }
        self.selection.click(path, &self.order, modifiers)
    }

    /// Resolve a click on the row at `index`; past the last row it is a
    /// click on empty canvas.
    pub fn click_row(&mut self, index: usize, modifiers: ClickModifiers) {
        match self.order.get(index).cloned() {
            Some(path) => {
                self.click(&path, modifiers);
            }
            None => self.click_outside(),
        }
    }

    pub fn click_outside(&mut self) {
        self.selection.click_outside();
    }

    /// Move the cursor by `delta` rows and select the landing row. With
    /// `extend`, the selection grows from the anchor like a shift click; a
    /// missing anchor is first set on the row the cursor leaves.
    pub fn move_cursor(&mut self, delta: isize, extend: bool) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let target = self.cursor.saturating_add_signed(delta).min(last);

        if extend {
            if self.selection.state().anchor.is_none() {
                let origin = self.order[self.cursor].clone();
                self.selection.click(&origin, &self.order, ClickModifiers::PLAIN);
            }
            let path = self.order[target].clone();
            self.click(&path, ClickModifiers::SHIFT);
        } else {
            let path = self.order[target].clone();
            self.click(&path, ClickModifiers::PLAIN);
        }
    }

    /// Toggle-select the row under the cursor.
    pub fn toggle_cursor_selection(&mut self) {
        if let Some(path) = self.order.get(self.cursor).cloned() {
            self.click(&path, ClickModifiers::TOGGLE);
        }
    }

    /// Keep the cursor inside a viewport of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
        let max_offset = self.rows.len().saturating_sub(visible_height);
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::StatusCode;

    fn entries(paths: &[&str]) -> Vec<PathEntry> {
        paths.iter().map(|p| PathEntry::new(*p)).collect()
    }

    fn panel_with(paths: &[&str]) -> Panel {
        let mut panel = Panel::new("Files");
        panel.set_entries(entries(paths));
        panel
    }

    fn order(panel: &Panel) -> Vec<&str> {
        panel.visible_order().iter().map(String::as_str).collect()
    }

    #[test]
    fn new_panel_shows_collapsed_top_level() {
        let panel = panel_with(&["src/app/main.rs", "src/lib.rs", "README.md"]);
        assert_eq!(order(&panel), vec!["src", "README.md"]);
    }

    #[test]
    fn toggle_folder_reveals_children() {
        let mut panel = panel_with(&["src/app/main.rs", "src/lib.rs", "README.md"]);
        assert!(panel.toggle_folder("src"));
        assert_eq!(order(&panel), vec!["src", "src/app", "src/lib.rs", "README.md"]);
        assert!(!panel.toggle_folder("README.md"));
    }

    #[test]
    fn search_expands_everything_then_restores_manual_state() {
        let mut panel = panel_with(&["src/app/foo.rs", "src/other.rs", "docs/foo.md"]);
        panel.toggle_folder("docs");

        panel.set_query("foo");
        assert!(panel.is_searching());
        assert_eq!(
            order(&panel),
            vec!["docs", "docs/foo.md", "src", "src/app", "src/app/foo.rs"]
        );
        assert!(panel.expansion().is_expanded("src/app", "foo"));

        panel.set_query("");
        assert!(!panel.is_searching());
        assert_eq!(order(&panel), vec!["docs", "docs/foo.md", "src"]);
    }

    #[test]
    fn toggles_are_ignored_while_searching() {
        let mut panel = panel_with(&["src/a.rs"]);
        panel.set_query("a");
        assert!(!panel.toggle_folder("src"));
        assert!(!panel.collapse_all());
        panel.set_query("");
        assert!(panel.expansion().manual().is_empty());
    }

    #[test]
    fn search_does_not_prune_manual_expansion() {
        let mut panel = panel_with(&["a/x.rs", "b/y.rs"]);
        panel.toggle_folder("a");
        panel.set_query("y.rs");
        assert_eq!(order(&panel), vec!["b", "b/y.rs"]);
        panel.set_query("");
        assert!(panel.expansion().manual().contains("a"));
    }

    #[test]
    fn rebuild_prunes_vanished_folders() {
        let mut panel = panel_with(&["a/x.rs", "b/y.rs"]);
        panel.expand_all();
        panel.set_entries(entries(&["b/y.rs", "c.rs"]));
        let manual: Vec<&str> = panel.expansion().manual().iter().map(String::as_str).collect();
        assert_eq!(manual, vec!["b"]);
        assert_eq!(order(&panel), vec!["b", "b/y.rs", "c.rs"]);
    }

    #[test]
    fn unchanged_query_reuses_built_tree() {
        let mut panel = panel_with(&["a/x.rs", "b/y.rs"]);
        let builds = panel.tree_builds;
        panel.set_query("x");
        assert_eq!(panel.tree_builds, builds + 1);
        panel.set_query("x ");
        panel.toggle_folder("a");
        panel.refresh();
        assert_eq!(panel.tree_builds, builds + 1);
    }

    #[test]
    fn folder_status_follows_displayed_tree() {
        let mut panel = Panel::new("Changes");
        panel.set_entries(vec![
            PathEntry::with_status("src/a.rs", StatusCode::Modified),
            PathEntry::with_status("src/b.rs", StatusCode::Deleted),
        ]);
        assert_eq!(panel.folder_status().get("src"), Some(&StatusCode::Deleted));
        panel.set_query("a.rs");
        assert_eq!(panel.folder_status().get("src"), Some(&StatusCode::Modified));
        assert_eq!(panel.rows()[0].status, Some(StatusCode::Modified));
    }

    #[test]
    fn range_selection_over_visible_rows() {
        let mut panel = panel_with(&["a", "b", "c", "d"]);
        panel.click("b", ClickModifiers::PLAIN);
        panel.click("d", ClickModifiers::SHIFT);
        assert_eq!(panel.selected_paths(), vec!["b", "c", "d"]);
        panel.click("a", ClickModifiers::SHIFT);
        assert_eq!(panel.selected_paths(), vec!["a", "b"]);
        assert_eq!(panel.selection().anchor.as_deref(), Some("b"));
    }

    #[test]
    fn click_on_hidden_row_is_noop() {
        let mut panel = panel_with(&["src/a.rs", "b.rs"]);
        panel.click("b.rs", ClickModifiers::PLAIN);
        let before = panel.selection().clone();
        panel.click("src/a.rs", ClickModifiers::PLAIN);
        assert_eq!(panel.selection(), &before);
    }

    #[test]
    fn click_past_last_row_clears_selection() {
        let mut panel = panel_with(&["a", "b"]);
        panel.click_row(0, ClickModifiers::PLAIN);
        panel.click_row(10, ClickModifiers::PLAIN);
        assert!(panel.selected_paths().is_empty());
        assert_eq!(panel.selection().anchor, None);
    }

    #[test]
    fn filtering_keeps_hidden_selection() {
        let mut panel = panel_with(&["alpha.rs", "beta.rs"]);
        panel.click("alpha.rs", ClickModifiers::TOGGLE);
        panel.click("beta.rs", ClickModifiers::TOGGLE);
        panel.set_query("beta");
        assert_eq!(order(&panel), vec!["beta.rs"]);
        assert_eq!(panel.selected_paths(), vec!["alpha.rs", "beta.rs"]);
        panel.set_query("");
        assert!(panel.is_selected("alpha.rs"));
    }

    #[test]
    fn collapse_and_reexpand_keeps_selection() {
        let mut panel = panel_with(&["src/a.rs", "src/b.rs"]);
        panel.toggle_folder("src");
        panel.click("src/a.rs", ClickModifiers::TOGGLE);
        panel.click("src/b.rs", ClickModifiers::TOGGLE);

        panel.toggle_folder("src");
        assert_eq!(order(&panel), vec!["src"]);
        assert_eq!(panel.selection().selected.len(), 2);

        panel.toggle_folder("src");
        assert_eq!(panel.selected_paths(), vec!["src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn search_round_trip_keeps_selection() {
        let mut panel = panel_with(&["src/a.rs", "src/b.rs"]);
        panel.toggle_folder("src");
        panel.click("src/a.rs", ClickModifiers::TOGGLE);
        panel.click("src/b.rs", ClickModifiers::TOGGLE);

        panel.set_query("a.rs");
        panel.set_query("");
        assert_eq!(panel.selected_paths(), vec!["src/a.rs", "src/b.rs"]);
        assert_eq!(panel.selection().anchor.as_deref(), Some("src/b.rs"));
    }

    #[test]
    fn shift_click_with_collapsed_anchor_acts_as_plain() {
        let mut panel = panel_with(&["src/a.rs", "b.rs", "c.rs"]);
        panel.toggle_folder("src");
        panel.click("src/a.rs", ClickModifiers::PLAIN);
        panel.toggle_folder("src");
        panel.click("c.rs", ClickModifiers::SHIFT);
        assert_eq!(panel.selected_paths(), vec!["c.rs"]);
        assert_eq!(panel.selection().anchor.as_deref(), Some("c.rs"));
    }

    #[test]
    fn new_entries_prune_vanished_selection() {
        let mut panel = panel_with(&["src/a.rs", "b.rs"]);
        panel.toggle_folder("src");
        panel.click("src/a.rs", ClickModifiers::PLAIN);
        panel.click("b.rs", ClickModifiers::TOGGLE);
        panel.click("src", ClickModifiers::TOGGLE);
        panel.set_entries(entries(&["b.rs", "c.rs"]));
        assert_eq!(panel.selected_paths(), vec!["b.rs"]);
        assert_eq!(panel.selection().anchor, None);
    }

    #[test]
    fn move_cursor_with_extend_grows_from_start_row() {
        let mut panel = panel_with(&["a", "b", "c", "d"]);
        panel.move_cursor(1, true);
        panel.move_cursor(1, true);
        assert_eq!(panel.selected_paths(), vec!["a", "b", "c"]);
        panel.move_cursor(-1, false);
        assert_eq!(panel.selected_paths(), vec!["b"]);
        assert_eq!(panel.cursor, 1);
    }

    #[test]
    fn move_cursor_clamps_at_edges() {
        let mut panel = panel_with(&["a", "b"]);
        panel.move_cursor(-5, false);
        assert_eq!(panel.cursor, 0);
        panel.move_cursor(5, false);
        assert_eq!(panel.cursor, 1);
    }

    #[test]
    fn collapse_or_parent_walks_up() {
        let mut panel = panel_with(&["src/a.rs"]);
        panel.toggle_folder("src");
        panel.click("src/a.rs", ClickModifiers::PLAIN);
        panel.collapse_or_parent();
        assert_eq!(panel.cursor_row().map(|r| r.path.as_str()), Some("src"));
        panel.collapse_or_parent();
        assert_eq!(order(&panel), vec!["src"]);
    }

    #[test]
    fn cursor_follows_row_across_rebuilds() {
        let mut panel = panel_with(&["a/x", "b"]);
        panel.click("b", ClickModifiers::PLAIN);
        panel.toggle_folder("a");
        assert_eq!(panel.cursor_row().map(|r| r.path.as_str()), Some("b"));
    }

    #[test]
    fn panels_do_not_share_state() {
        let mut files = panel_with(&["src/a.rs"]);
        let mut changes = panel_with(&["src/a.rs"]);
        files.toggle_folder("src");
        changes.click("src", ClickModifiers::PLAIN);
        assert!(changes.expansion().manual().is_empty());
        assert!(files.selected_paths().is_empty());
    }

    #[test]
    fn update_scroll_keeps_cursor_visible() {
        let mut panel = panel_with(&["a", "b", "c", "d", "e"]);
        panel.cursor = 4;
        panel.update_scroll(2);
        assert_eq!(panel.scroll_offset, 3);
        panel.cursor = 0;
        panel.update_scroll(2);
        assert_eq!(panel.scroll_offset, 0);
    }
}
