use crate::http::{classify_status, classify_transport};
use crate::provider::{EmbedResponse, EmbeddingProvider};
use async_trait::async_trait;
use semindex_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub struct OpenAiProvider {
  client: reqwest::Client,
  base_url: String,
  api_key: String,
  model: String,
  dimension: usize,
}

impl OpenAiProvider {
  pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into(),
      api_key: api_key.into(),
      model: model.into(),
      dimension,
    }
  }

  fn embeddings_url(&self) -> String {
    format!("{}/v1/embeddings", self.base_url.trim_end_matches('/'))
  }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
  model: &'a str,
  input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
  embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
  fn name(&self) -> &str {
    "openai"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  fn dimension(&self) -> usize {
    self.dimension
  }

  async fn is_available(&self) -> bool {
    !self.api_key.is_empty()
  }

  async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse> {
    if texts.is_empty() {
      return Ok(EmbedResponse {
        vectors: Vec::new(),
        model: self.model.clone(),
        dim: self.dimension,
      });
    }

    let request = EmbeddingRequest {
      model: &self.model,
      input: texts,
    };

    let response = self
      .client
      .post(self.embeddings_url())
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| classify_transport("openai", &e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(classify_status(status, "openai", &body));
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| Error::EmbedPermanent(format!("openai: malformed response body: {e}")))?;

    Ok(EmbedResponse {
      vectors: parsed.data.into_iter().map(|d| d.embedding).collect(),
      model: self.model.clone(),
      dim: self.dimension,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embeddings_url_strips_trailing_slash() {
    let provider = OpenAiProvider::new("https://api.openai.com/", "key", "text-embedding-3-small", 1536);
    assert_eq!(provider.embeddings_url(), "https://api.openai.com/v1/embeddings");
  }
}
