use serde::{Deserialize, Serialize};

/// Minimum number of lines a non-markdown chunk must span. Exposed as a
/// default constant only; chunkers take this as a configuration field rather
/// than reading it from a process-wide singleton.
pub const DEFAULT_MIN_COMPONENT_LINES: u32 = 4;

/// Hard cap on a chunk's UTF-8 byte length. Chunks exceeding this are split
/// at line boundaries before being handed to the embedder.
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 8192;

/// A materialized, indexable unit of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeChunk {
  pub rel_path: String,
  /// 1-based inclusive start line, as presented externally.
  pub start_line: u32,
  /// 1-based inclusive end line, as presented externally.
  pub end_line: u32,
  pub text: String,
  /// Content hash of the whole file this chunk was drawn from.
  pub content_hash: String,
  /// Deterministic id derived from `(rel_path, start_line, end_line, content_hash)`.
  pub chunk_id: String,
}

impl CodeChunk {
  pub fn new(rel_path: impl Into<String>, start_line: u32, end_line: u32, text: String, content_hash: impl Into<String>) -> Self {
    let rel_path = rel_path.into();
    let content_hash = content_hash.into();
    let chunk_id = crate::hash::chunk_id(&rel_path, start_line, end_line, &content_hash);
    Self {
      rel_path,
      start_line,
      end_line,
      text,
      content_hash,
      chunk_id,
    }
  }
}
