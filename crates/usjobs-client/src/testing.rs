//! In-process [`Transport`] double for unit tests.

use std::sync::Mutex;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};

type Responder =
  Box<dyn Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync>;

/// Answers each request from a closure given the request and its zero-based
/// call index, and records every request it sees.
pub struct ScriptedTransport {
  responder: Responder,
  requests:  Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
  pub fn new(
    responder: impl Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError>
    + Send
    + Sync
    + 'static,
  ) -> Self {
    Self { responder: Box::new(responder), requests: Mutex::new(Vec::new()) }
  }

  pub fn calls(&self) -> usize { self.requests.lock().unwrap().len() }

  pub fn requests(&self) -> Vec<HttpRequest> { self.requests.lock().unwrap().clone() }
}

impl Transport for ScriptedTransport {
  async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    let call = {
      let mut seen = self.requests.lock().unwrap();
      seen.push(request.clone());
      seen.len() - 1
    };
    (self.responder)(request, call)
  }
}

pub fn ok_json(body: &str) -> Result<HttpResponse, TransportError> {
  Ok(HttpResponse { status: 200, body: body.to_owned() })
}

/// A search page body reporting `count` results, with no items.
pub fn search_page(count: i64) -> String {
  serde_json::json!({
    "SearchResult": { "SearchResultCount": count, "SearchResultItems": [] }
  })
  .to_string()
}
