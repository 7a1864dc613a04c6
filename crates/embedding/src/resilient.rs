use crate::provider::{EmbedResponse, EmbeddingProvider};
use crate::retry::RetryConfig;
use async_trait::async_trait;
use semindex_core::{Error, Result};
use tracing::warn;

/// Wraps any [`EmbeddingProvider`] with the retry/backoff policy required of
/// every embedder and vector-store call. Transient errors are retried up to
/// `max_attempts`; permanent errors propagate immediately.
pub struct ResilientProvider<P: EmbeddingProvider> {
  inner: P,
  config: RetryConfig,
}

impl<P: EmbeddingProvider> ResilientProvider<P> {
  pub fn new(inner: P) -> Self {
    Self::with_config(inner, RetryConfig::default())
  }

  pub fn with_config(inner: P, config: RetryConfig) -> Self {
    Self { inner, config }
  }
}

#[async_trait]
impl<P: EmbeddingProvider> EmbeddingProvider for ResilientProvider<P> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  fn model_id(&self) -> &str {
    self.inner.model_id()
  }

  fn dimension(&self) -> usize {
    self.inner.dimension()
  }

  async fn is_available(&self) -> bool {
    self.inner.is_available().await
  }

  async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse> {
    let mut attempt = 0;
    loop {
      attempt += 1;
      let call = self.inner.embed_batch(texts);
      let outcome = tokio::time::timeout(self.config.request_timeout, call).await;

      let error = match outcome {
        Ok(Ok(response)) => return Ok(response),
        Ok(Err(e)) => e,
        Err(_) => Error::EmbedTransient(format!("{} request exceeded timeout", self.inner.name())),
      };

      let transient = matches!(error, Error::EmbedTransient(_));
      if !transient || attempt >= self.config.max_attempts {
        return Err(error);
      }

      let backoff = self.config.backoff_for_attempt(attempt);
      warn!(provider = self.inner.name(), attempt, ?backoff, "retrying transient embed error: {error}");
      tokio::time::sleep(backoff).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  struct FlakyProvider {
    calls: Arc<AtomicUsize>,
    fail_times: usize,
  }

  #[async_trait]
  impl EmbeddingProvider for FlakyProvider {
    fn name(&self) -> &str {
      "flaky"
    }
    fn model_id(&self) -> &str {
      "test-model"
    }
    fn dimension(&self) -> usize {
      4
    }
    async fn is_available(&self) -> bool {
      true
    }
    async fn embed_batch(&self, texts: &[String]) -> Result<EmbedResponse> {
      let n = self.calls.fetch_add(1, Ordering::SeqCst);
      if n < self.fail_times {
        return Err(Error::EmbedTransient("simulated transient failure".to_string()));
      }
      Ok(EmbedResponse {
        vectors: texts.iter().map(|_| vec![0.0; 4]).collect(),
        model: "test-model".to_string(),
        dim: 4,
      })
    }
  }

  #[tokio::test]
  async fn retries_transient_errors_until_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let inner = FlakyProvider {
      calls: calls.clone(),
      fail_times: 2,
    };
    let config = RetryConfig {
      base_backoff: Duration::from_millis(1),
      max_backoff: Duration::from_millis(5),
      ..RetryConfig::default()
    };
    let provider = ResilientProvider::with_config(inner, config);
    let result = provider.embed_batch(&["hello".to_string()]).await;
    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn permanent_errors_never_retry() {
    struct AlwaysPermanent;
    #[async_trait]
    impl EmbeddingProvider for AlwaysPermanent {
      fn name(&self) -> &str {
        "always-permanent"
      }
      fn model_id(&self) -> &str {
        "m"
      }
      fn dimension(&self) -> usize {
        4
      }
      async fn is_available(&self) -> bool {
        true
      }
      async fn embed_batch(&self, _texts: &[String]) -> Result<EmbedResponse> {
        Err(Error::EmbedPermanent("bad request".to_string()))
      }
    }
    let provider = ResilientProvider::new(AlwaysPermanent);
    let result = provider.embed_batch(&["hello".to_string()]).await;
    assert!(matches!(result, Err(Error::EmbedPermanent(_))));
  }
}
