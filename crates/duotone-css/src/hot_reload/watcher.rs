//! File watching for stylesheet rebuilds.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, DebouncedEventKind, Debouncer, new_debouncer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use crate::{Error, Result};

/// Event indicating a stylesheet file changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetChangeEvent {
    /// Path to the changed file.
    pub path: PathBuf,
    /// Type of change.
    pub kind: ChangeKind,
}

/// Type of file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was written or created.
    Modified,
    /// File was removed.
    Removed,
}

/// Watches `.css` files and directories of them for changes.
///
/// Directories are watched recursively; only files with a `.css` extension
/// are reported.
///
/// # Example
///
/// ```ignore
/// let mut watcher = StylesheetWatcher::new()?;
/// watcher.watch("styles")?;
///
/// loop {
///     for change in watcher.wait_for_changes(Duration::from_secs(1)) {
///         rebuild(&change.path)?;
///     }
/// }
/// ```
pub struct StylesheetWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
    watched_paths: HashSet<PathBuf>,
}

impl StylesheetWatcher {
    /// Create a watcher with the default 100ms debounce window.
    pub fn new() -> Result<Self> {
        Self::with_debounce(Duration::from_millis(100))
    }

    /// Create a watcher with a custom debounce window.
    pub fn with_debounce(timeout: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let debouncer = new_debouncer(timeout, tx)?;

        Ok(Self {
            debouncer,
            rx,
            watched_paths: HashSet::new(),
        })
    }

    /// Start watching a stylesheet file or a directory.
    pub fn watch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path
            .as_ref()
            .canonicalize()
            .map_err(|e| Error::io(path.as_ref(), e))?;

        if !self.watched_paths.contains(&path) {
            let mode = if path.is_dir() {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            self.debouncer.watcher().watch(&path, mode)?;

            tracing::info!("Watching stylesheets: {}", path.display());
            self.watched_paths.insert(path);
        }

        Ok(())
    }

    /// Stop watching a file or directory.
    pub fn unwatch(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = match path.as_ref().canonicalize() {
            Ok(p) => p,
            Err(_) => return Ok(()), // Nothing on disk, nothing watched
        };

        if self.watched_paths.remove(&path) {
            let _ = self.debouncer.watcher().unwatch(&path);
            tracing::info!("Stopped watching stylesheets: {}", path.display());
        }

        Ok(())
    }

    /// Return pending changes without blocking.
    pub fn poll(&mut self) -> Vec<StylesheetChangeEvent> {
        let mut changes = vec![];
        self.drain(&mut changes);
        finish(changes)
    }

    /// Block until changes arrive or `timeout` elapses.
    ///
    /// Returns an empty list on timeout.
    pub fn wait_for_changes(&mut self, timeout: Duration) -> Vec<StylesheetChangeEvent> {
        let mut changes = vec![];

        match self.rx.recv_timeout(timeout) {
            Ok(batch) => self.accept(batch, &mut changes),
            Err(RecvTimeoutError::Timeout) => return changes,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!("File watcher disconnected");
                return changes;
            }
        }

        self.drain(&mut changes);
        finish(changes)
    }

    /// Get the number of watched files and directories.
    pub fn watched_count(&self) -> usize {
        self.watched_paths.len()
    }

    /// Get the watched paths.
    pub fn watched_paths(&self) -> impl Iterator<Item = &Path> {
        self.watched_paths.iter().map(|p| p.as_path())
    }

    fn drain(&self, changes: &mut Vec<StylesheetChangeEvent>) {
        loop {
            match self.rx.try_recv() {
                Ok(batch) => self.accept(batch, changes),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("File watcher disconnected");
                    break;
                }
            }
        }
    }

    fn accept(&self, batch: DebounceEventResult, changes: &mut Vec<StylesheetChangeEvent>) {
        let events = match batch {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("File watcher error: {}", e);
                return;
            }
        };

        for event in events {
            if event.kind != DebouncedEventKind::Any || !self.is_relevant(&event.path) {
                continue;
            }

            let kind = if event.path.exists() {
                ChangeKind::Modified
            } else {
                ChangeKind::Removed
            };
            changes.push(StylesheetChangeEvent {
                path: event.path,
                kind,
            });
        }
    }

    fn is_relevant(&self, path: &Path) -> bool {
        let is_css = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("css"));

        is_css
            && self
                .watched_paths
                .iter()
                .any(|watched| path.starts_with(watched))
    }
}

/// Sort and deduplicate (the same file may have several events).
fn finish(mut changes: Vec<StylesheetChangeEvent>) -> Vec<StylesheetChangeEvent> {
    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes.dedup_by(|a, b| a.path == b.path);
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use tempfile::tempdir;

    #[test]
    fn watcher_creation() {
        let watcher = StylesheetWatcher::new();
        assert!(watcher.is_ok());
    }

    #[test]
    fn watch_file_and_directory() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("theme.css");
        fs::write(&file_path, ":root { --x: light-dark(red, blue); }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        watcher.watch(dir.path()).unwrap();
        watcher.watch(&file_path).unwrap();

        assert_eq!(watcher.watched_count(), 2);
    }

    #[test]
    fn watch_missing_path_fails() {
        let dir = tempdir().unwrap();
        let mut watcher = StylesheetWatcher::new().unwrap();

        let result = watcher.watch(dir.path().join("missing.css"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn unwatch_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("theme.css");
        fs::write(&file_path, ".a { color: red; }").unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 1);

        watcher.unwatch(&file_path).unwrap();
        assert_eq!(watcher.watched_count(), 0);
    }

    #[test]
    fn only_css_under_watched_roots_is_relevant() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let mut watcher = StylesheetWatcher::new().unwrap();
        watcher.watch(&root).unwrap();

        assert!(watcher.is_relevant(&root.join("a.css")));
        assert!(watcher.is_relevant(&root.join("nested/b.CSS")));
        assert!(!watcher.is_relevant(&root.join("notes.txt")));
        assert!(!watcher.is_relevant(Path::new("/elsewhere/c.css")));
    }

    #[test]
    fn poll_without_changes_is_empty() {
        let mut watcher = StylesheetWatcher::new().unwrap();
        assert!(watcher.poll().is_empty());
        assert!(watcher.wait_for_changes(Duration::from_millis(10)).is_empty());
    }
}
