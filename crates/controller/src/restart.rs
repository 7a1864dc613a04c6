use embedding::resolve_dimension;
use semindex_core::{ConfigSnapshot, EmbedderProvider};

/// Decides whether moving from `prev` to `next` requires tearing down and
/// restarting the indexer. Reflexive-false: comparing a snapshot to itself
/// never requires a restart (§8 invariant 5).
pub fn requires_restart(prev: &ConfigSnapshot, next: &ConfigSnapshot) -> bool {
  let prev_active = prev.enabled && prev.is_configured();
  let next_active = next.enabled && next.is_configured();

  if !prev_active && !next_active {
    return false;
  }
  if !prev_active && next_active {
    return true;
  }

  if prev.embedder_provider != next.embedder_provider {
    return true;
  }

  let prev_dim = resolve_dimension(prev);
  let next_dim = resolve_dimension(next);
  if prev_dim != next_dim {
    return true;
  }

  if credential_or_endpoint_changed(prev, next) {
    return true;
  }

  if prev.vector_store_url != next.vector_store_url || prev.vector_store_api_key != next.vector_store_api_key {
    return true;
  }

  false
}

fn credential_or_endpoint_changed(prev: &ConfigSnapshot, next: &ConfigSnapshot) -> bool {
  match next.embedder_provider {
    EmbedderProvider::Openai => prev.embedder_api_key != next.embedder_api_key,
    EmbedderProvider::Ollama => prev.embedder_endpoint != next.embedder_endpoint,
    EmbedderProvider::OpenaiCompatible => {
      prev.embedder_endpoint != next.embedder_endpoint
        || prev.embedder_api_key != next.embedder_api_key
        || prev.embedder_dimension != next.embedder_dimension
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use semindex_core::config::default_search_min_score;

  fn base() -> ConfigSnapshot {
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
  fn reflexive_comparison_never_requires_restart() {
    let config = base();
    assert!(!requires_restart(&config, &config));
  }

  #[test]
  fn both_disabled_is_false() {
    let mut prev = base();
    prev.enabled = false;
    let mut next = base();
    next.enabled = false;
    assert!(!requires_restart(&prev, &next));
  }

  #[test]
  fn enabling_previously_unconfigured_requires_restart() {
    let mut prev = base();
    prev.enabled = false;
    let next = base();
    assert!(requires_restart(&prev, &next));
  }

  #[test]
  fn provider_change_requires_restart() {
    let prev = base();
    let mut next = base();
    next.embedder_provider = EmbedderProvider::Openai;
    next.model_id = "text-embedding-3-small".to_string();
    assert!(requires_restart(&prev, &next));
  }

  #[test]
  fn dimension_change_requires_restart() {
    // S5: ollama/nomic-embed-text (768) -> a model with dim 1024.
    let prev = base();
    let mut next = base();
    next.model_id = "mxbai-embed-large".to_string();
    assert!(requires_restart(&prev, &next));
  }

  #[test]
  fn ollama_endpoint_change_requires_restart() {
    let prev = base();
    let mut next = base();
    next.embedder_endpoint = "http://other-host:11434".to_string();
    assert!(requires_restart(&prev, &next));
  }

  #[test]
  fn vector_store_url_change_requires_restart() {
    let prev = base();
    let mut next = base();
    next.vector_store_url = "http://other:6333".to_string();
    assert!(requires_restart(&prev, &next));
  }

  #[test]
  fn reflexive_comparison_with_unresolvable_dimension_never_requires_restart() {
    let mut config = base();
    config.embedder_provider = EmbedderProvider::OpenaiCompatible;
    config.model_id = "some-custom-model".to_string();
    config.embedder_dimension = None;
    assert!(!requires_restart(&config, &config));
  }

  #[test]
  fn unrelated_search_min_score_change_does_not_require_restart() {
    let prev = base();
    let mut next = base();
    next.search_min_score = 0.6;
    assert!(!requires_restart(&prev, &next));
  }
}
