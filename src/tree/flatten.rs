use super::node::{StatusCode, TreeNode};
use super::status::StatusMap;

/// One rendered row of the tree, in depth-first pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub is_folder: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    /// Leaf status for files, rolled-up status for folders.
    pub status: Option<StatusCode>,
}

/// Walk `nodes`, descending only into folders `is_expanded` accepts.
pub fn visible_rows<F>(
    nodes: &[TreeNode],
    folder_status: &StatusMap,
    leaf_status: &StatusMap,
    is_expanded: F,
) -> Vec<VisibleRow>
where
    F: Fn(&str) -> bool,
{
    let mut rows = Vec::new();
    push_rows(nodes, 0, folder_status, leaf_status, &is_expanded, &mut rows);
    rows
}

fn push_rows<F>(
    nodes: &[TreeNode],
    depth: usize,
    folder_status: &StatusMap,
    leaf_status: &StatusMap,
    is_expanded: &F,
    rows: &mut Vec<VisibleRow>,
) where
    F: Fn(&str) -> bool,
{
    for (i, node) in nodes.iter().enumerate() {
        let is_folder = node.is_folder();
        let expanded = is_folder && is_expanded(node.path.as_str());
        let status = if is_folder {
            folder_status.get(&node.path).copied()
        } else {
            leaf_status.get(&node.path).copied()
        };
        rows.push(VisibleRow {
            name: node.name.clone(),
            path: node.path.clone(),
            depth,
            is_folder,
            is_expanded: expanded,
            is_last_sibling: i + 1 == nodes.len(),
            status,
        });
        if expanded {
            push_rows(
                node.children(),
                depth + 1,
                folder_status,
                leaf_status,
                is_expanded,
                rows,
            );
        }
    }
}

/// Box-drawing indentation for `rows[index]`.
///
/// Top-level rows get a connector too, since the root is never shown.
pub fn row_prefix(rows: &[VisibleRow], index: usize) -> String {
    let Some(row) = rows.get(index) else {
        return String::new();
    };

    let mut prefix = String::new();
    for depth in 0..row.depth {
        // Nearest preceding row at `depth` is this row's ancestor at that level.
        let ancestor_is_last = rows[..index]
            .iter()
            .rev()
            .find(|r| r.depth <= depth)
            .map(|r| r.depth == depth && r.is_last_sibling)
            .unwrap_or(false);
        prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
    }
    prefix.push_str(if row.is_last_sibling { "└──" } else { "├──" });
    prefix
}

/// Full paths of every file node, depth-first.
pub fn leaf_paths(nodes: &[TreeNode]) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaves(nodes, &mut out);
    out
}

fn collect_leaves(nodes: &[TreeNode], out: &mut Vec<String>) {
    for node in nodes {
        if node.is_folder() {
            collect_leaves(node.children(), out);
        } else {
            out.push(node.path.clone());
        }
    }
}

/// Every node path, folders before their children, depth-first.
pub fn node_paths(nodes: &[TreeNode]) -> Vec<&str> {
    let mut out = Vec::new();
    collect_nodes(nodes, &mut out);
    out
}

fn collect_nodes<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a str>) {
    for node in nodes {
        out.push(node.path.as_str());
        if node.is_folder() {
            collect_nodes(node.children(), out);
        }
    }
}
