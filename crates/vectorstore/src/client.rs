use crate::retry::with_retry;
use embedding::RetryConfig;
use semindex_core::{Error, Payload, Result, ScoredPoint, VectorPoint};
use serde::{Deserialize, Serialize};
use tracing::info;

const UPSERT_BATCH_SIZE: usize = 100;

#[derive(Clone)]
pub struct VectorStoreClient {
  client: reqwest::Client,
  base_url: String,
  api_key: Option<String>,
  collection: String,
  retry: RetryConfig,
}

impl VectorStoreClient {
  pub fn new(base_url: impl Into<String>, api_key: Option<String>, collection: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: base_url.into(),
      api_key,
      collection: collection.into(),
      retry: RetryConfig::default(),
    }
  }

  fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
    let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
    let mut builder = self.client.request(method, url);
    if let Some(key) = &self.api_key {
      builder = builder.bearer_auth(key);
    }
    builder
  }

  async fn collection_info(&self) -> Result<Option<CollectionInfo>> {
    let response = self
      .request(reqwest::Method::GET, &format!("/collections/{}", self.collection))
      .send()
      .await
      .map_err(|e| transport_error("vector-store get-collection", &e))?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(status_error(status, "vector-store get-collection", &body));
    }
    let info: CollectionInfo = response
      .json()
      .await
      .map_err(|e| Error::VectorStorePermanent(format!("malformed collection info: {e}")))?;
    Ok(Some(info))
  }

  async fn create_collection(&self, dim: usize) -> Result<()> {
    let response = self
      .request(reqwest::Method::PUT, &format!("/collections/{}", self.collection))
      .json(&CreateCollectionRequest { dim })
      .send()
      .await
      .map_err(|e| transport_error("vector-store create-collection", &e))?;
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(status_error(status, "vector-store create-collection", &body));
    }
    Ok(())
  }

  async fn delete_collection(&self) -> Result<()> {
    let response = self
      .request(reqwest::Method::DELETE, &format!("/collections/{}", self.collection))
      .send()
      .await
      .map_err(|e| transport_error("vector-store delete-collection", &e))?;
    let status = response.status();
    if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
      let body = response.text().await.unwrap_or_default();
      return Err(status_error(status, "vector-store delete-collection", &body));
    }
    Ok(())
  }

  /// Ensures the collection exists with dimension `dim`. If it already
  /// exists with a different dimension, it is deleted and recreated — the
  /// mechanism by which an embedder dimension change takes effect.
  pub async fn ensure_collection(&self, dim: usize) -> Result<()> {
    with_retry("ensure_collection", &self.retry, || async {
      match self.collection_info().await? {
        None => self.create_collection(dim).await,
        Some(info) if info.dim != dim => {
          let mismatch = Error::DimensionMismatch {
            existing: info.dim,
            actual: dim,
          };
          info!(collection = self.collection, error = %mismatch, "recreating collection for dimension change");
          self.delete_collection().await?;
          self.create_collection(dim).await
        }
        Some(_) => Ok(()),
      }
    })
    .await
  }

  /// Upserts points idempotently by `chunkId`, in batches of at most 100.
  pub async fn upsert_points(&self, points: &[VectorPoint]) -> Result<()> {
    for batch in points.chunks(UPSERT_BATCH_SIZE) {
      with_retry("upsert_points", &self.retry, || async {
        let response = self
          .request(reqwest::Method::PUT, &format!("/collections/{}/points", self.collection))
          .json(&UpsertRequest { points: batch })
          .send()
          .await
          .map_err(|e| transport_error("vector-store upsert", &e))?;
        let status = response.status();
        if !status.is_success() {
          let body = response.text().await.unwrap_or_default();
          return Err(status_error(status, "vector-store upsert", &body));
        }
        Ok(())
      })
      .await?;
    }
    Ok(())
  }

  /// Removes all points whose payload `filePath` equals `rel_path`.
  pub async fn delete_by_file_path(&self, rel_path: &str) -> Result<()> {
    with_retry("delete_by_file_path", &self.retry, || async {
      let response = self
        .request(reqwest::Method::POST, &format!("/collections/{}/points/delete", self.collection))
        .json(&DeleteByFilePathRequest { file_path: rel_path })
        .send()
        .await
        .map_err(|e| transport_error("vector-store delete-by-path", &e))?;
      let status = response.status();
      if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, "vector-store delete-by-path", &body));
      }
      Ok(())
    })
    .await
  }

  /// Searches for nearest points, returning only those with `score >= min_score`,
  /// descending by score.
  pub async fn search(&self, query_vector: &[f32], limit: usize, min_score: f32) -> Result<Vec<ScoredPoint>> {
    with_retry("search", &self.retry, || async {
      let response = self
        .request(reqwest::Method::POST, &format!("/collections/{}/points/search", self.collection))
        .json(&SearchRequest {
          vector: query_vector,
          limit,
        })
        .send()
        .await
        .map_err(|e| transport_error("vector-store search", &e))?;
      let status = response.status();
      if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, "vector-store search", &body));
      }
      let parsed: SearchResponse = response
        .json()
        .await
        .map_err(|e| Error::VectorStorePermanent(format!("malformed search response: {e}")))?;

      let mut results: Vec<ScoredPoint> = parsed
        .results
        .into_iter()
        .filter(|r| r.score >= min_score)
        .map(|r| ScoredPoint {
          score: r.score,
          payload: r.payload,
        })
        .collect();
      results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
      Ok(results)
    })
    .await
  }
}

fn transport_error(op: &str, err: &reqwest::Error) -> Error {
  Error::VectorStoreTransient(format!("{op}: {err}"))
}

fn status_error(status: reqwest::StatusCode, op: &str, body: &str) -> Error {
  if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
    Error::VectorStoreTransient(format!("{op} returned {status}: {body}"))
  } else {
    Error::VectorStorePermanent(format!("{op} returned {status}: {body}"))
  }
}

#[derive(Deserialize)]
struct CollectionInfo {
  dim: usize,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
  dim: usize,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
  points: &'a [VectorPoint],
}

#[derive(Serialize)]
struct DeleteByFilePathRequest<'a> {
  file_path: &'a str,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
  vector: &'a [f32],
  limit: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
  results: Vec<SearchResultEntry>,
}

#[derive(Deserialize)]
struct SearchResultEntry {
  score: f32,
  payload: Payload,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn search_results_filter_below_min_score() {
    let entries = vec![
      SearchResultEntry {
        score: 0.39,
        payload: sample_payload(),
      },
      SearchResultEntry {
        score: 0.5,
        payload: sample_payload(),
      },
    ];
    let filtered: Vec<_> = entries.into_iter().filter(|r| r.score >= 0.4).collect();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].score, 0.5);
  }

  fn sample_payload() -> Payload {
    Payload {
      file_path: "a.rs".to_string(),
      start_line: 1,
      end_line: 2,
      code_chunk: "fn a() {}".to_string(),
      content_hash: "abc".to_string(),
    }
  }
}
