use std::collections::HashMap;

use super::builder::normalize;
use super::node::{NodeKind, PathEntry, StatusCode, TreeNode};

/// Path to status, keyed by normalized path.
pub type StatusMap = HashMap<String, StatusCode>;

/// Collect the per-leaf status map from provider entries.
///
/// Paths are normalized so they line up with built node paths. A later entry
/// for the same path replaces an earlier one.
pub fn leaf_status_map(entries: &[PathEntry]) -> StatusMap {
    entries
        .iter()
        .filter_map(|entry| {
            let status = entry.status?;
            Some((normalize(&entry.path)?, status))
        })
        .collect()
}

/// Roll leaf statuses up into their folders.
///
/// Each folder gets the highest-priority status found among the file leaves
/// of its subtree. Folders without any status-bearing leaf are left out.
pub fn aggregate(nodes: &[TreeNode], leaf_status: &StatusMap) -> StatusMap {
    let mut folders = StatusMap::new();
    for node in nodes {
        visit(node, leaf_status, &mut folders);
    }
    folders
}

fn visit(node: &TreeNode, leaf_status: &StatusMap, out: &mut StatusMap) -> Option<StatusCode> {
    match &node.kind {
        NodeKind::File => leaf_status.get(&node.path).copied(),
        NodeKind::Folder { children } => {
            let mut best: Option<StatusCode> = None;
            for child in children {
                if let Some(status) = visit(child, leaf_status, out) {
                    best = higher(best, status);
                }
            }
            if let Some(status) = best {
                out.insert(node.path.clone(), status);
            }
            best
        }
    }
}

fn higher(current: Option<StatusCode>, candidate: StatusCode) -> Option<StatusCode> {
    match current {
        Some(existing) if existing.priority() >= candidate.priority() => Some(existing),
        _ => Some(candidate),
    }
}
