use serde::Serialize;

/// Single-letter change classification attached to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCode {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
    #[serde(rename = "T")]
    TypeChanged,
}

impl StatusCode {
    /// Parse a status letter. Anything outside `A M D R T` is `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::Added),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            'T' => Some(Self::TypeChanged),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::TypeChanged => 'T',
        }
    }

    /// Rank used when rolling statuses up into folders. Higher wins.
    pub fn priority(self) -> u8 {
        match self {
            Self::Deleted => 4,
            Self::Added => 3,
            Self::Modified => 2,
            Self::Renamed => 1,
            Self::TypeChanged => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::TypeChanged => "type changed",
        }
    }
}

/// One relative path from a file-listing or status provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: String,
    pub status: Option<StatusCode>,
}

impl PathEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: None,
        }
    }

    pub fn with_status(path: impl Into<String>, status: StatusCode) -> Self {
        Self {
            path: path.into(),
            status: Some(status),
        }
    }
}

/// File or folder payload of a [`TreeNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder { children: Vec<TreeNode> },
}

/// A node of the built path tree. `path` is the full `/`-joined path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl TreeNode {
    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Children of a folder; files have none.
    pub fn children(&self) -> &[TreeNode] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File => &[],
        }
    }
}
