//! Click resolution over the visible row order.
//!
//! Plain clicks select one row and move the anchor, toggle clicks (ctrl, or
//! cmd on macOS) flip one row and move the anchor, and shift clicks select the
//! contiguous run between the anchor and the clicked row without moving it.

use std::collections::BTreeSet;

/// Selected paths plus the pivot for the next shift click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected: BTreeSet<String>,
    pub anchor: Option<String>,
}

impl SelectionState {
    fn single(path: &str) -> Self {
        Self {
            selected: BTreeSet::from([path.to_string()]),
            anchor: Some(path.to_string()),
        }
    }
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    pub shift: bool,
    /// Ctrl on Windows/Linux, cmd on macOS.
    pub toggle: bool,
}

impl ClickModifiers {
    pub const PLAIN: Self = Self {
        shift: false,
        toggle: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        toggle: false,
    };
    pub const TOGGLE: Self = Self {
        shift: false,
        toggle: true,
    };
}

/// Resolve a click on `path` against the current visible `order`.
///
/// A path missing from `order` leaves `state` unchanged.
pub fn resolve_click(
    state: &SelectionState,
    path: &str,
    order: &[String],
    modifiers: ClickModifiers,
) -> SelectionState {
    let Some(target) = order.iter().position(|p| p == path) else {
        return state.clone();
    };

    if modifiers.shift {
        let anchor_index = state
            .anchor
            .as_deref()
            .and_then(|anchor| order.iter().position(|p| p == anchor));
        if let Some(anchor_index) = anchor_index {
            let start = anchor_index.min(target);
            let end = anchor_index.max(target);
            return SelectionState {
                selected: order[start..=end].iter().cloned().collect(),
                anchor: state.anchor.clone(),
            };
        }
        return SelectionState::single(path);
    }

    if modifiers.toggle {
        let mut selected = state.selected.clone();
        if !selected.remove(path) {
            selected.insert(path.to_string());
        }
        return SelectionState {
            selected,
            anchor: Some(path.to_string()),
        };
    }

    SelectionState::single(path)
}

/// Owns one panel's selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a click and return the resulting state.
    pub fn click(
        &mut self,
        path: &str,
        order: &[String],
        modifiers: ClickModifiers,
    ) -> &SelectionState {
        self.state = resolve_click(&self.state, path, order, modifiers);
        &self.state
    }

    /// A click on empty canvas: nothing selected, no anchor.
    pub fn click_outside(&mut self) {
        self.state = SelectionState::default();
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.state.selected.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.state.selected.is_empty()
    }

    /// Selected paths in the order they appear in `order`.
    pub fn selected_in_order<'a>(&self, order: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        order
            .into_iter()
            .filter(|path| self.state.selected.contains(*path))
            .map(str::to_string)
            .collect()
    }

    /// Drop selected paths (and the anchor) for which `exists` is false.
    ///
    /// Rows that are only hidden by a collapsed folder or a query must still
    /// exist here; this is for paths gone from the data set.
    pub fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        self.state.selected.retain(|path| exists(path));
        if self.state.anchor.as_deref().is_some_and(|anchor| !exists(anchor)) {
            self.state.anchor = None;
        }
    }
}
