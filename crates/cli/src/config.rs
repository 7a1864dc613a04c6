//! Project config file loading: `.semindex.toml` at the workspace root,
//! read-only from the indexer's perspective (§6).

use semindex_core::{ConfigSnapshot, EmbedderProvider};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".semindex.toml";

#[derive(Debug, Deserialize)]
struct FileConfig {
  #[serde(default)]
  enabled: bool,
  #[serde(default = "default_provider")]
  embedder_provider: String,
  #[serde(default)]
  model_id: String,
  #[serde(default)]
  embedder_endpoint: String,
  #[serde(default)]
  embedder_api_key: Option<String>,
  #[serde(default)]
  embedder_dimension: Option<usize>,
  #[serde(default)]
  vector_store_url: String,
  #[serde(default)]
  vector_store_api_key: Option<String>,
  #[serde(default = "semindex_core::config::default_search_min_score")]
  search_min_score: f32,
}

fn default_provider() -> String {
  "ollama".to_string()
}

/// Loads `<root>/.semindex.toml`, falling back to an unconfigured disabled
/// snapshot if the file is absent.
pub fn load_for_project(root: &Path) -> anyhow::Result<ConfigSnapshot> {
  let path = root.join(CONFIG_FILE_NAME);
  let file = match std::fs::read_to_string(&path) {
    Ok(contents) => toml::from_str::<FileConfig>(&contents)?,
    Err(_) => FileConfig {
      enabled: false,
      embedder_provider: default_provider(),
      model_id: String::new(),
      embedder_endpoint: String::new(),
      embedder_api_key: None,
      embedder_dimension: None,
      vector_store_url: String::new(),
      vector_store_api_key: None,
      search_min_score: semindex_core::config::default_search_min_score(),
    },
  };

  let embedder_provider = match file.embedder_provider.as_str() {
    "openai" => EmbedderProvider::Openai,
    "openai-compatible" => EmbedderProvider::OpenaiCompatible,
    _ => EmbedderProvider::Ollama,
  };

  Ok(ConfigSnapshot {
    enabled: file.enabled,
    embedder_provider,
    model_id: file.model_id,
    embedder_endpoint: file.embedder_endpoint,
    embedder_api_key: file.embedder_api_key,
    embedder_dimension: file.embedder_dimension,
    vector_store_url: file.vector_store_url,
    vector_store_api_key: file.vector_store_api_key,
    search_min_score: file.search_min_score,
  })
}

/// `<dirs::cache_dir>/semindex/<hash>`, created by the caller before use.
pub fn cache_dir_for(workspace_root: &Path) -> PathBuf {
  let base = dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join("semindex");
  let hash = semindex_core::hash::hash_hex_prefix(&workspace_root.to_string_lossy(), 16);
  base.join(hash)
}
