//! Path-tree engine: build, roll up statuses, filter, expand, select.
//!
//! Everything here is synchronous and free of I/O. The two controllers
//! ([`ExpansionState`], [`SelectionController`]) hold state for exactly one
//! panel; the rest are pure functions.

pub mod builder;
pub mod expansion;
pub mod filter;
pub mod flatten;
pub mod node;
pub mod selection;
pub mod status;

pub use builder::{build, normalize, BuiltTree};
pub use expansion::{ExpansionState, Mode};
pub use filter::{highlight, Segment};
pub use flatten::{leaf_paths, node_paths, row_prefix, visible_rows, VisibleRow};
pub use node::{NodeKind, PathEntry, StatusCode, TreeNode};
pub use selection::{resolve_click, ClickModifiers, SelectionController, SelectionState};
pub use status::{aggregate, leaf_status_map, StatusMap};
