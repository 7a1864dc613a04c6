use crate::watcher::{ChangeKind, FileChange, FileWatcher, WatchError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 500ms coalescing window over raw watcher events, per the watcher's
/// debounce contract.
const FILE_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone)]
struct PendingChange {
  kind: ChangeKind,
  last_seen: Instant,
}

impl PendingChange {
  fn new(kind: ChangeKind) -> Self {
    Self {
      kind,
      last_seen: Instant::now(),
    }
  }

  fn update(&mut self, kind: ChangeKind) {
    self.last_seen = Instant::now();
    self.kind = match (self.kind, kind) {
      (ChangeKind::Created, ChangeKind::Modified) => ChangeKind::Created,
      (ChangeKind::Modified, ChangeKind::Deleted) => ChangeKind::Deleted,
      (ChangeKind::Created, ChangeKind::Deleted) => ChangeKind::Deleted,
      (_, latest) => latest,
    };
  }
}

/// Debounces and deduplicates raw watcher events by path, feeding the
/// pipeline an incremental delta once each path's 500ms window has elapsed.
pub struct DebouncedWatcher {
  watcher: FileWatcher,
  pending: HashMap<PathBuf, PendingChange>,
}

impl DebouncedWatcher {
  pub fn new(root: &Path) -> Result<Self, WatchError> {
    Ok(Self {
      watcher: FileWatcher::new(root)?,
      pending: HashMap::new(),
    })
  }

  pub fn root(&self) -> &Path {
    self.watcher.root()
  }

  fn poll_raw(&mut self) {
    while let Some(change) = self.watcher.poll() {
      self
        .pending
        .entry(change.path.clone())
        .and_modify(|p| p.update(change.kind))
        .or_insert_with(|| PendingChange::new(change.kind));
    }
  }

  /// Changes whose debounce window has elapsed, removed from the pending set.
  pub fn collect_ready(&mut self) -> Vec<FileChange> {
    self.poll_raw();

    let now = Instant::now();
    let window = Duration::from_millis(FILE_DEBOUNCE_MS);
    let ready_paths: Vec<PathBuf> = self
      .pending
      .iter()
      .filter(|(_, pending)| now.duration_since(pending.last_seen) >= window)
      .map(|(path, _)| path.clone())
      .collect();

    ready_paths
      .into_iter()
      .filter_map(|path| {
        self.pending.remove(&path).map(|pending| FileChange {
          path,
          kind: pending.kind,
        })
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_then_modify_coalesces_to_create() {
    let mut pending = PendingChange::new(ChangeKind::Created);
    pending.update(ChangeKind::Modified);
    assert_eq!(pending.kind, ChangeKind::Created);
  }

  #[test]
  fn modify_then_delete_collapses_to_delete() {
    let mut pending = PendingChange::new(ChangeKind::Modified);
    pending.update(ChangeKind::Deleted);
    assert_eq!(pending.kind, ChangeKind::Deleted);
  }

  #[test]
  fn create_then_delete_collapses_to_delete() {
    let mut pending = PendingChange::new(ChangeKind::Created);
    pending.update(ChangeKind::Deleted);
    assert_eq!(pending.kind, ChangeKind::Deleted);
  }
}
