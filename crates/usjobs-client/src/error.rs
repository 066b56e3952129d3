//! Error type for `usjobs-client`.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  /// Every attempt failed at the transport level. Not retried further up.
  #[error("GET {url} failed after {attempts} attempt(s): {source}")]
  Request {
    url:      String,
    attempts: u32,
    #[source]
    source:   TransportError,
  },

  #[error("GET {url} returned HTTP {status}")]
  UnexpectedStatus { url: String, status: u16 },

  #[error("GET {url} returned a body that is not JSON: {source}")]
  Decode {
    url:    String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Core(#[from] usjobs_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
