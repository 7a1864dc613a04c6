use serde::{Deserialize, Serialize};

/// A single file discovered during a workspace scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
  /// Absolute filesystem path.
  pub abs_path: String,
  /// Path relative to the workspace root, used as the stable key everywhere
  /// else (manifest, vector payload, chunk id).
  pub rel_path: String,
  /// Extension, lowercased, without the leading dot. Empty if the file has
  /// none.
  pub ext: String,
  /// Content hash of the file's bytes (see [`crate::hash::content_hash_hex`]).
  pub content_hash: String,
}

impl FileDescriptor {
  pub fn new(abs_path: impl Into<String>, rel_path: impl Into<String>, bytes: &[u8]) -> Self {
    let rel_path = rel_path.into();
    let ext = std::path::Path::new(&rel_path)
      .extension()
      .and_then(|e| e.to_str())
      .unwrap_or_default()
      .to_lowercase();
    Self {
      abs_path: abs_path.into(),
      rel_path,
      ext,
      content_hash: crate::hash::content_hash_hex(bytes),
    }
  }
}
