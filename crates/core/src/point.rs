use serde::{Deserialize, Serialize};

/// The fixed payload schema stored alongside every vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
  pub file_path: String,
  pub start_line: u32,
  pub end_line: u32,
  pub code_chunk: String,
  pub content_hash: String,
}

/// A `(id, vector, payload)` triple as stored in a vector-store collection.
/// All points in a collection share the same vector dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPoint {
  pub id: String,
  pub vector: Vec<f32>,
  pub payload: Payload,
}

/// A scored point returned from a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPoint {
  pub score: f32,
  pub payload: Payload,
}
