//! Path providers: directory walks and status listings.
//!
//! Both produce flat [`PathEntry`] lists for a [`crate::panel::Panel`]. Parsing
//! is lenient; lines or directory entries that cannot be used are skipped.

use std::fs;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::tree::{PathEntry, StatusCode};

/// Options for [`walk_dir`].
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Include dot-files and dot-directories.
    pub show_hidden: bool,
    /// Directory or file names skipped wherever they appear.
    pub ignore: Vec<String>,
}

/// Parse status lines in the shape of `git status --porcelain`.
///
/// Accepted forms: `XY path`, `X path`, `XY old -> new` (the new path is kept)
/// and bare `path`. Untracked (`??`) entries count as added; ignored (`!!`)
/// entries are dropped.
pub fn parse_status_lines(text: &str) -> Vec<PathEntry> {
    text.lines().filter_map(parse_status_line).collect()
}

fn parse_status_line(line: &str) -> Option<PathEntry> {
    if line.trim().is_empty() {
        return None;
    }

    let chars: Vec<char> = line.chars().collect();
    let (columns, rest): (&[char], String) = if chars.len() >= 4
        && is_status_column(chars[0])
        && is_status_column(chars[1])
        && chars[2] == ' '
    {
        (&chars[..2], chars[3..].iter().collect())
    } else if chars.len() >= 3 && is_status_column(chars[0]) && chars[0] != ' ' && chars[1] == ' ' {
        (&chars[..1], chars[2..].iter().collect())
    } else {
        (&[], line.trim().to_string())
    };

    if columns == ['!', '!'] {
        return None;
    }

    let path = match rest.split_once(" -> ") {
        Some((_, renamed)) => renamed.trim().to_string(),
        None => rest.trim().to_string(),
    };
    if path.is_empty() {
        return None;
    }

    let status = if columns == ['?', '?'] {
        Some(StatusCode::Added)
    } else {
        columns
            .iter()
            .filter(|c| **c != ' ')
            .find_map(|c| StatusCode::from_char(*c))
    };

    Some(PathEntry { path, status })
}

fn is_status_column(c: char) -> bool {
    matches!(c, ' ' | 'A' | 'M' | 'D' | 'R' | 'T' | 'C' | 'U' | '?' | '!')
}

/// Read and parse a status listing from disk.
pub fn load_status_file(path: &Path) -> Result<Vec<PathEntry>> {
    let text = fs::read_to_string(path)?;
    let entries = parse_status_lines(&text);
    tracing::debug!(file = %path.display(), entries = entries.len(), "status file loaded");
    Ok(entries)
}

/// List every file under `root` as a `/`-joined relative path, sorted.
///
/// Symlinks are listed but never followed. Unreadable entries are skipped.
pub fn walk_dir(root: &Path, options: &WalkOptions) -> Result<Vec<PathEntry>> {
    if !root.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut paths = Vec::new();
    walk_into(root, "", options, &mut paths);
    paths.sort();
    tracing::debug!(root = %root.display(), files = paths.len(), "directory walked");
    Ok(paths.into_iter().map(PathEntry::new).collect())
}

fn walk_into(dir: &Path, prefix: &str, options: &WalkOptions, out: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), %err, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }
        if options.ignore.iter().any(|pattern| *pattern == name) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if file_type.is_dir() {
            walk_into(&entry.path(), &relative, options, out);
        } else {
            out.push(relative);
        }
    }
}
