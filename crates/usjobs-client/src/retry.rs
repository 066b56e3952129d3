//! Bounded, fixed-interval retry around a [`Transport`].
//!
//! Only transport failures are retried. A response with any status code is a
//! success at this layer; interpreting the status is the caller's job.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::{
  Error, Result,
  transport::{DEFAULT_TIMEOUT, HttpRequest, HttpResponse, Transport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Retries after the first attempt; a request is sent at most
  /// `retry_attempts + 1` times.
  pub retry_attempts: u32,
  /// Fixed sleep between attempts.
  pub backoff:        Duration,
  /// Per-attempt timeout applied to requests built with
  /// [`RetryClient::request`].
  pub timeout:        Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      retry_attempts: 3,
      backoff:        Duration::from_secs(2),
      timeout:        DEFAULT_TIMEOUT,
    }
  }
}

pub struct RetryClient<T> {
  transport: T,
  policy:    RetryPolicy,
}

impl<T: Transport> RetryClient<T> {
  pub fn new(transport: T, policy: RetryPolicy) -> Self { Self { transport, policy } }

  pub fn transport(&self) -> &T { &self.transport }

  /// Start a GET request carrying the policy's timeout.
  pub fn request(&self, url: impl Into<String>) -> HttpRequest {
    HttpRequest::get(url).timeout(self.policy.timeout)
  }

  /// Send `request`, retrying transport failures.
  ///
  /// Exactly one call on first success; `retry_attempts + 1` calls before
  /// giving up with [`Error::Request`], which wraps the last failure.
  pub async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
    let mut attempt: u32 = 0;
    loop {
      attempt += 1;
      match self.transport.get(request).await {
        Ok(response) => {
          info!(url = %request.url, status = response.status, attempt, "GET succeeded");
          return Ok(response);
        }
        Err(source) if attempt <= self.policy.retry_attempts => {
          warn!(
            url = %request.url,
            attempt,
            backoff_ms = self.policy.backoff.as_millis() as u64,
            error = %source,
            "GET failed, retrying"
          );
          tokio::time::sleep(self.policy.backoff).await;
        }
        Err(source) => {
          error!(url = %request.url, attempts = attempt, error = %source, "GET failed, giving up");
          return Err(Error::Request {
            url: request.url.clone(),
            attempts: attempt,
            source,
          });
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{ScriptedTransport, ok_json};

  fn policy(retry_attempts: u32) -> RetryPolicy {
    RetryPolicy { retry_attempts, backoff: Duration::ZERO, ..RetryPolicy::default() }
  }

  #[tokio::test]
  async fn first_success_is_a_single_call() {
    let client = RetryClient::new(ScriptedTransport::new(|_, _| ok_json("{}")), policy(3));
    let resp = client.get(&client.request("http://api.test/x")).await.unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(client.transport().calls(), 1);
  }

  #[tokio::test]
  async fn recovers_after_transient_failures() {
    let transport = ScriptedTransport::new(|_, call| {
      if call < 2 { Err("connection reset".into()) } else { ok_json("{}") }
    });
    let client = RetryClient::new(transport, policy(3));
    client.get(&client.request("http://api.test/x")).await.unwrap();
    assert_eq!(client.transport().calls(), 3);
  }

  #[tokio::test]
  async fn exhausting_retries_makes_attempts_plus_one_calls() {
    let transport = ScriptedTransport::new(|_, _| Err("timed out".into()));
    let client = RetryClient::new(transport, policy(3));

    let err = client
      .get(&client.request("http://api.test/x"))
      .await
      .unwrap_err();

    assert_eq!(client.transport().calls(), 4);
    match err {
      Error::Request { url, attempts, source } => {
        assert_eq!(url, "http://api.test/x");
        assert_eq!(attempts, 4);
        assert_eq!(source.to_string(), "timed out");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn zero_retries_means_one_call() {
    let transport = ScriptedTransport::new(|_, _| Err("refused".into()));
    let client = RetryClient::new(transport, policy(0));
    assert!(client.get(&client.request("http://api.test/x")).await.is_err());
    assert_eq!(client.transport().calls(), 1);
  }

  #[tokio::test]
  async fn error_status_is_not_retried() {
    let transport = ScriptedTransport::new(|_, _| {
      Ok(HttpResponse { status: 503, body: "busy".into() })
    });
    let client = RetryClient::new(transport, policy(3));
    let resp = client.get(&client.request("http://api.test/x")).await.unwrap();
    assert_eq!(resp.status, 503);
    assert_eq!(client.transport().calls(), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn waits_the_fixed_backoff_between_attempts() {
    let transport = ScriptedTransport::new(|_, _| Err("down".into()));
    let client = RetryClient::new(transport, RetryPolicy {
      retry_attempts: 2,
      backoff: Duration::from_secs(2),
      ..RetryPolicy::default()
    });

    let started = tokio::time::Instant::now();
    assert!(client.get(&client.request("http://api.test/x")).await.is_err());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5), "{elapsed:?}");
  }

  #[test]
  fn request_carries_policy_timeout() {
    let client = RetryClient::new(
      ScriptedTransport::new(|_, _| ok_json("{}")),
      RetryPolicy { timeout: Duration::from_secs(5), ..RetryPolicy::default() },
    );
    assert_eq!(client.request("u").timeout, Duration::from_secs(5));
  }
}
