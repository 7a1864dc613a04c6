/// Static dimension lookup for providers whose models have a fixed,
/// well-known embedding width. `openai-compatible` has no table entry — its
/// dimension always comes from the explicit config field.
pub fn lookup_dimension(provider: &str, model_id: &str) -> Option<usize> {
  match provider {
    "openai" => openai_dimension(model_id),
    "ollama" => ollama_dimension(model_id),
    _ => None,
  }
}

fn openai_dimension(model_id: &str) -> Option<usize> {
  match model_id {
    "text-embedding-3-small" => Some(1536),
    "text-embedding-3-large" => Some(3072),
    "text-embedding-ada-002" => Some(1536),
    _ => None,
  }
}

fn ollama_dimension(model_id: &str) -> Option<usize> {
  match model_id {
    "nomic-embed-text" => Some(768),
    "mxbai-embed-large" => Some(1024),
    "qwen3-embedding" => Some(4096),
    "all-minilm" => Some(384),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_openai_model_resolves() {
    assert_eq!(lookup_dimension("openai", "text-embedding-3-small"), Some(1536));
  }

  #[test]
  fn unknown_model_is_unresolvable() {
    assert_eq!(lookup_dimension("openai", "mystery-model"), None);
    assert_eq!(lookup_dimension("openai-compatible", "anything"), None);
  }
}
