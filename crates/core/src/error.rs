use thiserror::Error;

/// Error kinds distinguishable by tag, per the core's error handling design.
#[derive(Error, Debug)]
pub enum Error {
  #[error("parse error in {path}: {message}")]
  Parse { path: String, message: String },

  #[error("embedder transient error: {0}")]
  EmbedTransient(String),

  #[error("embedder permanent error: {0}")]
  EmbedPermanent(String),

  #[error("vector store transient error: {0}")]
  VectorStoreTransient(String),

  #[error("vector store permanent error: {0}")]
  VectorStorePermanent(String),

  #[error("invalid configuration: {0}")]
  ConfigInvalid(String),

  #[error("vector dimension mismatch: collection has {existing}, embedder produces {actual}")]
  DimensionMismatch { existing: usize, actual: usize },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Whether this error should move the indexer state machine to `Error`.
  pub fn is_fatal(&self) -> bool {
    matches!(
      self,
      Error::EmbedPermanent(_) | Error::VectorStorePermanent(_) | Error::ConfigInvalid(_) | Error::Io(_)
    )
  }
}

pub type Result<T> = std::result::Result<T, Error>;
