use serde::{Deserialize, Serialize};

/// Which embedder wire protocol a snapshot targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbedderProvider {
  Openai,
  Ollama,
  OpenaiCompatible,
}

/// The configuration the indexer is running against, read from the
/// surrounding application's config file. The indexer never writes this; it
/// only diffs successive snapshots to decide whether a restart is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
  pub enabled: bool,
  pub embedder_provider: EmbedderProvider,
  pub model_id: String,
  pub embedder_endpoint: String,
  pub embedder_api_key: Option<String>,
  pub embedder_dimension: Option<usize>,
  pub vector_store_url: String,
  pub vector_store_api_key: Option<String>,
  #[serde(default = "default_search_min_score")]
  pub search_min_score: f32,
}

pub fn default_search_min_score() -> f32 {
  0.4
}

impl ConfigSnapshot {
  /// Whether the snapshot has enough information to start an indexing run.
  pub fn is_configured(&self) -> bool {
    !self.model_id.is_empty() && !self.embedder_endpoint.is_empty() && !self.vector_store_url.is_empty()
  }
}
