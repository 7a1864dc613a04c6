pub mod error;
pub mod indexer;

pub use error::{DaemonError, Result};
pub use indexer::Indexer;
