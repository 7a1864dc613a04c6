use serde::{Deserialize, Serialize};

/// The indexer's externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexerState {
  Standby,
  Indexing,
  Indexed,
  Watching,
  Error,
}

/// Progress within the current run, reported through `onProgressUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
  pub state: IndexerState,
  pub processed_items: u64,
  pub total_items: u64,
  pub message: String,
}

impl Progress {
  pub fn new(state: IndexerState) -> Self {
    Self {
      state,
      processed_items: 0,
      total_items: 0,
      message: String::new(),
    }
  }
}
