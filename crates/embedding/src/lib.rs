pub mod http;
pub mod model_table;
pub mod provider;
pub mod providers;
pub mod resilient;
pub mod retry;

pub use provider::{chunk_into_batches, EmbedResponse, EmbeddingProvider, DEFAULT_BATCH_SIZE};
pub use resilient::ResilientProvider;
pub use retry::RetryConfig;

use providers::{compatible::OpenAiCompatibleProvider, ollama::OllamaProvider, openai::OpenAiProvider};
use semindex_core::{ConfigSnapshot, EmbedderProvider, Error, Result};

/// Resolve the dimension of a configured provider/model pair. For
/// openai-compatible this is always the explicit config value; for the
/// other two it comes from the static model table, and is unresolvable
/// (`None`) for models the table doesn't know about.
pub fn resolve_dimension(config: &ConfigSnapshot) -> Option<usize> {
  match config.embedder_provider {
    EmbedderProvider::OpenaiCompatible => config.embedder_dimension,
    EmbedderProvider::Openai => model_table::lookup_dimension("openai", &config.model_id),
    EmbedderProvider::Ollama => model_table::lookup_dimension("ollama", &config.model_id),
  }
}

/// Build the resilient, ready-to-use provider for a config snapshot.
/// `ConfigInvalid` surfaces if the dimension cannot be resolved, matching
/// §4.I's "conservatively treat unresolvable dimensions as requiring
/// attention" stance.
pub fn create_provider(config: &ConfigSnapshot) -> Result<ResilientProvider<Box<dyn EmbeddingProvider>>> {
  let dimension = resolve_dimension(config)
    .ok_or_else(|| Error::ConfigInvalid(format!("cannot resolve embedding dimension for model {}", config.model_id)))?;

  let inner: Box<dyn EmbeddingProvider> = match config.embedder_provider {
    EmbedderProvider::Openai => {
      let api_key = config
        .embedder_api_key
        .clone()
        .ok_or_else(|| Error::ConfigInvalid("openai provider requires embedderApiKey".to_string()))?;
      Box::new(OpenAiProvider::new(&config.embedder_endpoint, api_key, &config.model_id, dimension))
    }
    EmbedderProvider::Ollama => Box::new(OllamaProvider::new(&config.embedder_endpoint, &config.model_id, dimension)),
    EmbedderProvider::OpenaiCompatible => Box::new(OpenAiCompatibleProvider::new(
      &config.embedder_endpoint,
      config.embedder_api_key.clone(),
      &config.model_id,
      dimension,
    )),
  };

  Ok(ResilientProvider::new(inner))
}

#[async_trait::async_trait]
impl EmbeddingProvider for Box<dyn EmbeddingProvider> {
  fn name(&self) -> &str {
    (**self).name()
  }
  fn model_id(&self) -> &str {
    (**self).model_id()
  }
  fn dimension(&self) -> usize {
    (**self).dimension()
  }
  async fn is_available(&self) -> bool {
    (**self).is_available().await
  }
  async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse> {
    (**self).embed_batch(texts).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use semindex_core::config::default_search_min_score;

  fn base_config() -> ConfigSnapshot {
    ConfigSnapshot {
      enabled: true,
      embedder_provider: EmbedderProvider::Ollama,
      model_id: "nomic-embed-text".to_string(),
      embedder_endpoint: "http://localhost:11434".to_string(),
      embedder_api_key: None,
      embedder_dimension: None,
      vector_store_url: "http://localhost:6333".to_string(),
      vector_store_api_key: None,
      search_min_score: default_search_min_score(),
    }
  }

  #[test]
  fn resolves_known_ollama_model_dimension() {
    let config = base_config();
    assert_eq!(resolve_dimension(&config), Some(768));
  }

  #[test]
  fn unresolvable_dimension_is_config_invalid() {
    let mut config = base_config();
    config.model_id = "unknown-model".to_string();
    assert!(matches!(create_provider(&config), Err(Error::ConfigInvalid(_))));
  }

  #[test]
  fn openai_compatible_uses_explicit_dimension() {
    let mut config = base_config();
    config.embedder_provider = EmbedderProvider::OpenaiCompatible;
    config.embedder_dimension = Some(768);
    assert_eq!(resolve_dimension(&config), Some(768));
  }
}
