//! Flat path list to sorted tree.
//!
//! Construction is two-phase: paths are inserted into a mutable draft keyed by
//! segment, then the draft is frozen once into sorted [`TreeNode`]s. Sibling
//! order is only decided during the freeze, so insertion order never matters.

use std::collections::{BTreeSet, HashMap};

use super::node::{NodeKind, TreeNode};

/// Output of [`build`]: the root's children plus every folder path in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltTree {
    pub nodes: Vec<TreeNode>,
    pub folder_paths: BTreeSet<String>,
}

impl BuiltTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Default)]
struct Draft {
    children: HashMap<String, Draft>,
    is_folder: bool,
}

/// Collapse empty segments: `"a//b/"` becomes `"a/b"`.
///
/// Returns `None` when nothing but separators is left.
pub fn normalize(path: &str) -> Option<String> {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Build the tree for a set of `/`-separated relative paths.
///
/// A name used both as an intermediate segment and as a terminal path becomes
/// a folder. Paths consisting only of separators are skipped.
pub fn build<I, S>(paths: I) -> BuiltTree
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut root = Draft::default();
    let mut folder_paths = BTreeSet::new();

    for path in paths {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let Some(last) = segments.len().checked_sub(1) else {
            continue;
        };

        let mut node = &mut root;
        let mut prefix = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            node = node.children.entry((*segment).to_string()).or_default();
            if i < last {
                node.is_folder = true;
                if !folder_paths.contains(prefix.as_str()) {
                    folder_paths.insert(prefix.clone());
                }
            }
        }
    }

    BuiltTree {
        nodes: freeze(root.children, ""),
        folder_paths,
    }
}

fn freeze(children: HashMap<String, Draft>, parent: &str) -> Vec<TreeNode> {
    let mut nodes: Vec<TreeNode> = children
        .into_iter()
        .map(|(name, draft)| {
            let path = if parent.is_empty() {
                name.clone()
            } else {
                format!("{parent}/{name}")
            };
            let kind = if draft.is_folder {
                NodeKind::Folder {
                    children: freeze(draft.children, &path),
                }
            } else {
                NodeKind::File
            };
            TreeNode { name, path, kind }
        })
        .collect();

    sort_siblings(&mut nodes);
    nodes
}

/// Folders first, then files; each group by case-sensitive name.
fn sort_siblings(nodes: &mut [TreeNode]) {
    nodes.sort_by(|a, b| {
        b.is_folder()
            .cmp(&a.is_folder())
            .then_with(|| a.name.cmp(&b.name))
    });
}
