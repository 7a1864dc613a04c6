use serde::{Deserialize, Serialize};

/// A definition surfaced by the tag-capture processor: a syntactic span
/// worth turning into a chunk, plus the source line used to label it.
///
/// `start_line`/`end_line` are 0-based internally; callers presenting this to
/// users convert to 1-based inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionCapture {
  pub start_line: u32,
  pub end_line: u32,
  pub header_line: String,
  pub name: Option<String>,
}

impl DefinitionCapture {
  pub fn span(&self) -> u32 {
    self.end_line - self.start_line + 1
  }
}
