use reqwest::StatusCode;
use semindex_core::Error;

/// Map an HTTP response status to the transient/permanent split used
/// throughout the error model: 429 and 5xx are retryable, everything else
/// (4xx, malformed bodies) is not.
pub fn classify_status(status: StatusCode, provider: &str, body: &str) -> Error {
  if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
    Error::EmbedTransient(format!("{provider} returned {status}: {body}"))
  } else {
    Error::EmbedPermanent(format!("{provider} returned {status}: {body}"))
  }
}

/// A request-level transport failure (timeout, connection refused) is always
/// transient — it carries no information ruling out success on retry.
pub fn classify_transport(provider: &str, err: &reqwest::Error) -> Error {
  if err.is_timeout() {
    Error::EmbedTransient(format!("{provider} request timed out: {err}"))
  } else {
    Error::EmbedTransient(format!("{provider} transport error: {err}"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rate_limit_is_transient() {
    assert!(matches!(
      classify_status(StatusCode::TOO_MANY_REQUESTS, "openai", ""),
      Error::EmbedTransient(_)
    ));
  }

  #[test]
  fn bad_request_is_permanent() {
    assert!(matches!(classify_status(StatusCode::BAD_REQUEST, "openai", ""), Error::EmbedPermanent(_)));
  }

  #[test]
  fn server_error_is_transient() {
    assert!(matches!(
      classify_status(StatusCode::SERVICE_UNAVAILABLE, "openai", ""),
      Error::EmbedTransient(_)
    ));
  }
}
