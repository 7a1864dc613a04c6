use embedding::RetryConfig;
use semindex_core::{Error, Result};
use std::future::Future;
use tracing::warn;

/// Runs `op` under the shared embedder/vector-store backoff policy, retrying
/// `VectorStoreTransient` failures and propagating everything else.
pub async fn with_retry<T, F, Fut>(op_name: &str, config: &RetryConfig, mut op: F) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T>>,
{
  let mut attempt = 0;
  loop {
    attempt += 1;
    let outcome = tokio::time::timeout(config.request_timeout, op()).await;

    let error = match outcome {
      Ok(Ok(value)) => return Ok(value),
      Ok(Err(e)) => e,
      Err(_) => Error::VectorStoreTransient(format!("{op_name} exceeded request timeout")),
    };

    let transient = matches!(error, Error::VectorStoreTransient(_));
    if !transient || attempt >= config.max_attempts {
      return Err(error);
    }

    let backoff = config.backoff_for_attempt(attempt);
    warn!(op_name, attempt, ?backoff, "retrying transient vector-store error: {error}");
    tokio::time::sleep(backoff).await;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;
  use std::time::Duration;

  #[tokio::test]
  async fn retries_until_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = RetryConfig {
      base_backoff: Duration::from_millis(1),
      max_backoff: Duration::from_millis(2),
      ..RetryConfig::default()
    };
    let result = with_retry("test", &config, || {
      let calls = calls.clone();
      async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
          Err(Error::VectorStoreTransient("not yet".to_string()))
        } else {
          Ok(42)
        }
      }
    })
    .await;
    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn permanent_errors_do_not_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let result: Result<()> = with_retry("test", &RetryConfig::default(), || {
      let calls = calls.clone();
      async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::VectorStorePermanent("nope".to_string()))
      }
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
