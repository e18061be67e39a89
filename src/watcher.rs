use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// What a panel was loaded from, and therefore what to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchTarget {
    /// A directory, watched recursively.
    Dir(PathBuf),
    /// A single status file. Its parent directory is watched so that
    /// editors that replace the file atomically are still noticed.
    File(PathBuf),
}

/// Watches one panel's source and reports changes as `Event::SourceChanged`.
pub struct SourceWatcher {
    /// Handle to the debouncer (dropped to stop watching).
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl SourceWatcher {
    /// Start watching `target` on behalf of panel `panel`.
    ///
    /// Events are debounced by `debounce_duration`. For directory targets,
    /// paths matching any of `ignore_patterns` are dropped.
    pub fn new(
        panel: usize,
        target: WatchTarget,
        debounce_duration: Duration,
        ignore_patterns: Vec<String>,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let (watch_path, mode) = match &target {
            WatchTarget::Dir(dir) => (dir.clone(), notify::RecursiveMode::Recursive),
            WatchTarget::File(file) => (
                file.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
                notify::RecursiveMode::NonRecursive,
            ),
        };

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let paths: Vec<&Path> = events
                        .iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .map(|e| e.path.as_path())
                        .collect();
                    if is_relevant(&paths, &target, &ignore_patterns) {
                        let _ = event_tx.send(Event::SourceChanged(panel));
                    }
                }
                Err(err) => {
                    tracing::warn!(panel, error = %err, "watcher error");
                }
            },
        )?;

        debouncer.watcher().watch(&watch_path, mode)?;
        tracing::debug!(panel, path = %watch_path.display(), "watching source");

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Whether a batch of changed paths should trigger a reload of `target`.
pub fn is_relevant(paths: &[&Path], target: &WatchTarget, ignore_patterns: &[String]) -> bool {
    match target {
        WatchTarget::Dir(_) => paths.iter().any(|p| !should_ignore(p, ignore_patterns)),
        WatchTarget::File(file) => {
            let name = file.file_name();
            paths.iter().any(|p| p.file_name() == name)
        }
    }
}

/// Check if a path should be ignored based on ignore patterns.
///
/// A path is ignored if any of its components match any ignore pattern exactly.
pub fn should_ignore(path: &Path, patterns: &[String]) -> bool {
    path.components().any(|component| match component {
        std::path::Component::Normal(name) => {
            let name_str = name.to_string_lossy();
            patterns.iter().any(|pattern| name_str == *pattern)
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_git_directory() {
        let patterns = vec![".git".to_string()];
        assert!(should_ignore(
            Path::new("/home/user/project/.git/HEAD"),
            &patterns
        ));
        assert!(should_ignore(
            Path::new("/home/user/project/.git/objects/abc"),
            &patterns
        ));
    }

    #[test]
    fn do_not_ignore_normal_paths() {
        let patterns = vec![".git".to_string(), "node_modules".to_string()];
        assert!(!should_ignore(
            Path::new("/home/user/project/src/main.rs"),
            &patterns
        ));
    }

    #[test]
    fn empty_patterns_ignore_nothing() {
        assert!(!should_ignore(Path::new("/project/.git/HEAD"), &[]));
    }

    #[test]
    fn partial_name_does_not_match() {
        let patterns = vec!["target".to_string()];
        assert!(!should_ignore(
            Path::new("/project/target2/file.txt"),
            &patterns
        ));
    }

    #[test]
    fn dir_target_needs_one_unignored_path() {
        let target = WatchTarget::Dir(PathBuf::from("/p"));
        let patterns = vec!["target".to_string()];
        let ignored = [Path::new("/p/target/debug/x")];
        assert!(!is_relevant(&ignored, &target, &patterns));
        let mixed = [Path::new("/p/target/debug/x"), Path::new("/p/src/lib.rs")];
        assert!(is_relevant(&mixed, &target, &patterns));
    }

    #[test]
    fn file_target_matches_by_name_only() {
        let target = WatchTarget::File(PathBuf::from("/p/changes.txt"));
        assert!(is_relevant(&[Path::new("/p/changes.txt")], &target, &[]));
        assert!(!is_relevant(&[Path::new("/p/other.txt")], &target, &[]));
        assert!(!is_relevant(&[], &target, &[]));
    }
}
