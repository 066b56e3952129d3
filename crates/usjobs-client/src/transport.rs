//! The raw "perform GET, return status + body" capability.
//!
//! [`Transport`] is the seam the retry client is written against; the
//! production implementation is [`ReqwestTransport`].

use std::{future::Future, time::Duration};

use reqwest::Client;

use crate::{Error, Result};

/// A connection-, timeout- or I/O-level failure. A non-2xx response is not a
/// transport error.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

// ─── Request / response ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
  pub url:     String,
  pub query:   Vec<(String, String)>,
  pub headers: Vec<(String, String)>,
  pub timeout: Duration,
}

impl HttpRequest {
  pub fn get(url: impl Into<String>) -> Self {
    Self {
      url:     url.into(),
      query:   Vec::new(),
      headers: Vec::new(),
      timeout: DEFAULT_TIMEOUT,
    }
  }

  pub fn query(mut self, key: &str, value: impl ToString) -> Self {
    self.query.push((key.to_owned(), value.to_string()));
    self
  }

  pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
    self.headers.push((name.to_owned(), value.into()));
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn query_value(&self, key: &str) -> Option<&str> {
    self
      .query
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body:   String,
}

impl HttpResponse {
  pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

pub trait Transport: Send + Sync {
  fn get<'a>(
    &'a self,
    request: &'a HttpRequest,
  ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send + 'a;
}

// ─── reqwest ─────────────────────────────────────────────────────────────────

/// Production transport. Cheap to clone: the inner [`reqwest::Client`] is
/// `Arc`-based.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: Client,
}

impl ReqwestTransport {
  pub fn new(verify_tls: bool) -> Result<Self> {
    let client = Client::builder()
      .danger_accept_invalid_certs(!verify_tls)
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client })
  }
}

impl Transport for ReqwestTransport {
  async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = self
      .client
      .get(&request.url)
      .query(&request.query)
      .timeout(request.timeout);
    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }

    let resp = builder.send().await?;
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    Ok(HttpResponse { status, body })
  }
}
