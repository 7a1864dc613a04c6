use crate::http::{classify_status, classify_transport};
use crate::provider::{EmbedResponse, EmbeddingProvider};
use async_trait::async_trait;
use semindex_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;

const MAX_CONCURRENT_REQUESTS: usize = 4;

/// Ollama has no batch embedding endpoint, so `embed_batch` fans one request
/// out per input with bounded concurrency.
pub struct OllamaProvider {
  client: reqwest::Client,
  base_url: String,
  model: String,
  dimension: usize,
}

impl OllamaProvider {
  pub fn new(base_url: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into(),
      model: model.into(),
      dimension,
    }
  }

  fn embeddings_url(&self) -> String {
    format!("{}/api/embeddings", self.base_url.trim_end_matches('/'))
  }

  async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
    let request = EmbeddingRequest {
      model: &self.model,
      prompt: text,
    };

    let response = self
      .client
      .post(self.embeddings_url())
      .json(&request)
      .send()
      .await
      .map_err(|e| classify_transport("ollama", &e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(classify_status(status, "ollama", &body));
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| Error::EmbedPermanent(format!("ollama: malformed response body: {e}")))?;
    Ok(parsed.embedding)
  }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
  fn name(&self) -> &str {
    "ollama"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  fn dimension(&self) -> usize {
    self.dimension
  }

  async fn is_available(&self) -> bool {
    self.client.get(&self.base_url).send().await.map(|r| r.status().is_success()).unwrap_or(false)
  }

  async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse> {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS));
    let futures = texts.iter().map(|text| {
      let semaphore = semaphore.clone();
      async move {
        let _permit = semaphore
          .acquire()
          .await
          .map_err(|_| Error::EmbedTransient("ollama: semaphore closed".to_string()))?;
        self.embed_one(text).await
      }
    });

    let vectors: Vec<Vec<f32>> = futures::future::try_join_all(futures).await?;

    Ok(EmbedResponse {
      vectors,
      model: self.model.clone(),
      dim: self.dimension,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embeddings_url_joins_base() {
    let provider = OllamaProvider::new("http://localhost:11434", "nomic-embed-text", 768);
    assert_eq!(provider.embeddings_url(), "http://localhost:11434/api/embeddings");
  }
}
