use crate::http::{classify_status, classify_transport};
use crate::provider::{EmbedResponse, EmbeddingProvider};
use async_trait::async_trait;
use semindex_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Generic OpenAI-shaped endpoint whose base URL, key, and dimension are all
/// explicit config rather than resolved from a model table.
pub struct OpenAiCompatibleProvider {
  client: reqwest::Client,
  base_url: String,
  api_key: Option<String>,
  model: String,
  dimension: usize,
}

impl OpenAiCompatibleProvider {
  pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>, dimension: usize) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into(),
      api_key,
      model: model.into(),
      dimension,
    }
  }

  fn embeddings_url(&self) -> String {
    format!("{}/embeddings", self.base_url.trim_end_matches('/'))
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
impl EmbeddingProvider for OpenAiCompatibleProvider {
  fn name(&self) -> &str {
    "openai-compatible"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  fn dimension(&self) -> usize {
    self.dimension
  }

  async fn is_available(&self) -> bool {
    true
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

    let mut builder = self.client.post(self.embeddings_url()).json(&request);
    if let Some(key) = &self.api_key {
      builder = builder.bearer_auth(key);
    }

    let response = builder.send().await.map_err(|e| classify_transport("openai-compatible", &e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(classify_status(status, "openai-compatible", &body));
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| Error::EmbedPermanent(format!("openai-compatible: malformed response body: {e}")))?;

    Ok(EmbedResponse {
      vectors: parsed.data.into_iter().map(|d| d.embedding).collect(),
      model: self.model.clone(),
      dim: self.dimension,
    })
  }
}
