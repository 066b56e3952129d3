//! Page-driven search pagination.
//!
//! The search endpoint does not advertise how many pages exist. Pages are
//! requested from 1 upwards until one reports a result count of zero; that
//! final page is still fetched and handed to the caller.

use serde_json::Value;
use tracing::{debug, warn};
use usjobs_core::normalize::result_count;

use crate::{
  AUTH_HEADER, Error, Result,
  retry::RetryClient,
  transport::{HttpResponse, Transport},
};

/// One decoded page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
  /// 1-based page number as sent to the server.
  pub page:         u32,
  pub result_count: i64,
  pub body:         Value,
}

/// Lazily walks the pages of one keyword search.
///
/// Unbounded by default: termination relies on the server eventually
/// reporting zero results. [`with_max_pages`](Self::with_max_pages) adds a
/// safety cap.
pub struct SearchPaginator<'a, T> {
  client:           &'a RetryClient<T>,
  search_url:       String,
  keyword:          String,
  results_per_page: u32,
  auth_key:         String,
  max_pages:        Option<u32>,
  next:             u32,
  done:             bool,
}

impl<'a, T: Transport> SearchPaginator<'a, T> {
  pub fn new(
    client: &'a RetryClient<T>,
    search_url: impl Into<String>,
    keyword: impl Into<String>,
    results_per_page: u32,
    auth_key: impl Into<String>,
  ) -> Self {
    Self {
      client,
      search_url: search_url.into(),
      keyword: keyword.into(),
      results_per_page,
      auth_key: auth_key.into(),
      max_pages: None,
      next: 1,
      done: false,
    }
  }

  pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
    self.max_pages = max_pages;
    self
  }

  /// Pages requested so far.
  pub fn pages_fetched(&self) -> u32 { self.next - 1 }

  /// Fetch the next page, or `None` once the zero-count page has been
  /// returned (or the cap is hit).
  pub async fn next_page(&mut self) -> Result<Option<SearchPage>> {
    if self.done {
      return Ok(None);
    }
    if self.max_pages.is_some_and(|cap| self.next > cap) {
      warn!(
        keyword = %self.keyword,
        max_pages = self.max_pages,
        "page cap reached before the server reported zero results"
      );
      self.done = true;
      return Ok(None);
    }

    let page = self.next;
    let request = self
      .client
      .request(self.search_url.as_str())
      .query("Keyword", &self.keyword)
      .query("ResultsPerPage", self.results_per_page)
      .query("Page", page)
      .header(AUTH_HEADER, self.auth_key.as_str());

    let response = self.client.get(&request).await?;
    let body = decode_json(&request.url, response)?;
    let count = result_count(&body)?;

    self.next += 1;
    if count == 0 {
      self.done = true;
    }
    debug!(keyword = %self.keyword, page, result_count = count, "search page fetched");

    Ok(Some(SearchPage { page, result_count: count, body }))
  }
}

/// Bare authenticated GET of a JSON document, e.g. a code list.
pub async fn fetch_json<T: Transport>(
  client: &RetryClient<T>,
  url: &str,
  auth_key: &str,
) -> Result<Value> {
  let request = client.request(url).header(AUTH_HEADER, auth_key);
  let response = client.get(&request).await?;
  decode_json(url, response)
}

fn decode_json(url: &str, response: HttpResponse) -> Result<Value> {
  if !response.is_success() {
    return Err(Error::UnexpectedStatus { url: url.to_owned(), status: response.status });
  }
  serde_json::from_str(&response.body).map_err(|source| Error::Decode {
    url: url.to_owned(),
    source,
  })
}
