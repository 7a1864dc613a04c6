use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaemonError {
  #[error(transparent)]
  Core(#[from] semindex_core::Error),
  #[error(transparent)]
  Watch(#[from] index::WatchError),
  #[error("indexer is not enabled and configured")]
  NotConfigured,
}

pub type Result<T> = std::result::Result<T, DaemonError>;
