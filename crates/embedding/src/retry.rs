use std::time::Duration;

/// Exponential backoff policy. Defaults are the fixed values required of
/// both the embedder and vector-store clients: base 250ms, factor 2, capped
/// at 8s, 5 attempts, 30s per-request timeout.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
  pub max_attempts: u32,
  pub base_backoff: Duration,
  pub max_backoff: Duration,
  pub backoff_multiplier: f64,
  pub request_timeout: Duration,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_attempts: 5,
      base_backoff: Duration::from_millis(250),
      max_backoff: Duration::from_secs(8),
      backoff_multiplier: 2.0,
      request_timeout: Duration::from_secs(30),
    }
  }
}

impl RetryConfig {
  /// Backoff before the (1-based) retry numbered `attempt`. `attempt == 1`
  /// is the first retry after the initial try, so it waits `base_backoff`.
  pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
    let exp = self.base_backoff.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32 - 1);
    Duration::from_secs_f64(exp.min(self.max_backoff.as_secs_f64()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn backoff_doubles_each_attempt() {
    let cfg = RetryConfig::default();
    assert_eq!(cfg.backoff_for_attempt(1), Duration::from_millis(250));
    assert_eq!(cfg.backoff_for_attempt(2), Duration::from_millis(500));
    assert_eq!(cfg.backoff_for_attempt(3), Duration::from_millis(1000));
  }

  #[test]
  fn backoff_caps_at_max() {
    let cfg = RetryConfig::default();
    assert_eq!(cfg.backoff_for_attempt(10), Duration::from_secs(8));
  }
}
