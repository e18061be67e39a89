use std::collections::BTreeSet;

use super::filter;

/// Which rule currently decides folder visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The manually curated set governs.
    Browsing,
    /// A query is active; every folder reads as expanded.
    Searching,
}

/// Expanded-folder bookkeeping for one panel.
///
/// `expanded` is the manually curated set. It is only ever changed by the
/// explicit toggles and by [`ExpansionState::reconcile`]; an active search
/// overrides what [`ExpansionState::is_expanded`] reports without touching it.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
    folders: BTreeSet<String>,
}

impl ExpansionState {
    /// Start with every folder collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt the folder set of a freshly built tree and drop manual entries
    /// that no longer name a folder.
    pub fn reconcile(&mut self, folder_paths: &BTreeSet<String>) {
        let before = self.expanded.len();
        self.expanded.retain(|path| folder_paths.contains(path));
        let pruned = before - self.expanded.len();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped stale expanded folders");
        }
        self.folders = folder_paths.clone();
    }

    /// Flip `path` in the manual set. Returns `false` when `path` is not a folder.
    pub fn toggle(&mut self, path: &str) -> bool {
        if !self.folders.contains(path) {
            return false;
        }
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
        true
    }

    /// Set one folder's manual state. Non-folders are ignored.
    pub fn set_expanded(&mut self, path: &str, expanded: bool) -> bool {
        if !self.folders.contains(path) {
            return false;
        }
        if expanded {
            self.expanded.insert(path.to_string())
        } else {
            self.expanded.remove(path)
        }
    }

    /// Expand or collapse every listed folder in one batch.
    pub fn toggle_all<'a, I>(&mut self, folder_paths: I, target_expanded: bool)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for path in folder_paths {
            if target_expanded {
                if self.folders.contains(path) {
                    self.expanded.insert(path.clone());
                }
            } else {
                self.expanded.remove(path);
            }
        }
    }

    /// Whether `path` should render expanded under `active_query`.
    pub fn is_expanded(&self, path: &str, active_query: &str) -> bool {
        match self.mode(active_query) {
            Mode::Searching => self.folders.contains(path),
            Mode::Browsing => self.expanded.contains(path),
        }
    }

    pub fn mode(&self, active_query: &str) -> Mode {
        if filter::is_active(active_query) {
            Mode::Searching
        } else {
            Mode::Browsing
        }
    }

    /// The manually curated set, unaffected by searching.
    pub fn manual(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn is_folder(&self, path: &str) -> bool {
        self.folders.contains(path)
    }
}
