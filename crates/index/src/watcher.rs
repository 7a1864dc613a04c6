use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum WatchError {
  #[error("notify error: {0}")]
  Notify(#[from] notify::Error),
  #[error("watch channel disconnected")]
  ChannelRecv,
}

/// A coalesced kind of filesystem change: a modify-then-delete collapses to
/// `Deleted`, per the watcher's coalescing contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  Created,
  Modified,
  Deleted,
}

#[derive(Debug, Clone)]
pub struct FileChange {
  pub path: PathBuf,
  pub kind: ChangeKind,
}

/// Raw, un-debounced filesystem watch on a workspace root.
pub struct FileWatcher {
  _watcher: RecommendedWatcher,
  receiver: Receiver<Result<Event, notify::Error>>,
  root: PathBuf,
}

impl FileWatcher {
  pub fn new(root: &Path) -> Result<Self, WatchError> {
    Self::with_poll_interval(root, Duration::from_secs(2))
  }

  pub fn with_poll_interval(root: &Path, poll_interval: Duration) -> Result<Self, WatchError> {
    let (tx, rx) = channel();
    let config = Config::default().with_poll_interval(poll_interval);
    let mut watcher = RecommendedWatcher::new(move |res| {
      let _ = tx.send(res);
    }, config)?;
    watcher.watch(root, RecursiveMode::Recursive)?;

    Ok(Self {
      _watcher: watcher,
      receiver: rx,
      root: root.to_path_buf(),
    })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Non-blocking: returns the next pending change, if any.
  pub fn poll(&self) -> Option<FileChange> {
    match self.receiver.try_recv() {
      Ok(Ok(event)) => self.process_event(event),
      Ok(Err(e)) => {
        warn!("watch error: {e}");
        None
      }
      Err(_) => None,
    }
  }

  fn process_event(&self, event: Event) -> Option<FileChange> {
    let path = event.paths.first()?.clone();
    if path.is_dir() {
      return None;
    }

    let kind = match event.kind {
      EventKind::Create(_) => ChangeKind::Created,
      EventKind::Modify(_) => ChangeKind::Modified,
      EventKind::Remove(_) => ChangeKind::Deleted,
      _ => {
        debug!("ignoring non-CRUD event for {path:?}");
        return None;
      }
    };

    Some(FileChange { path, kind })
  }
}
