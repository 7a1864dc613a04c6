use async_trait::async_trait;
use semindex_core::Result;

pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Result of embedding one batch of texts; vectors are aligned to input order.
#[derive(Debug, Clone)]
pub struct EmbedResponse {
  pub vectors: Vec<Vec<f32>>,
  pub model: String,
  pub dim: usize,
}

/// Shared capability across the three provider variants. Errors use
/// [`semindex_core::Error::EmbedTransient`] / `EmbedPermanent` so retry
/// policy can be decided without knowing which variant produced them.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
  fn name(&self) -> &str;
  fn model_id(&self) -> &str;
  fn dimension(&self) -> usize;
  async fn is_available(&self) -> bool;
  async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse>;
}

/// Split `texts` into at-most-`batch_size` groups, preserving order.
pub fn chunk_into_batches(texts: &[String], batch_size: usize) -> Vec<&[String]> {
  if batch_size == 0 {
    return vec![texts];
  }
  texts.chunks(batch_size).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_batch_size_is_64() {
    assert_eq!(DEFAULT_BATCH_SIZE, 64);
  }

  #[test]
  fn chunking_splits_on_boundary() {
    let texts: Vec<String> = (0..130).map(|i| i.to_string()).collect();
    let batches = chunk_into_batches(&texts, 64);
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 64);
    assert_eq!(batches[2].len(), 2);
  }
}
