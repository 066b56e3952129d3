//! HTTP side of the usjobs ETL: a pluggable transport, a fixed-interval retry
//! client on top of it, and the page-driven search paginator.

// Native `async fn` in traits; the `Send` bounds are spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod paginate;
pub mod retry;
pub mod transport;

pub use error::{Error, Result};
pub use paginate::{SearchPage, SearchPaginator, fetch_json};
pub use retry::{RetryClient, RetryPolicy};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

/// Header carrying the static API key on every request.
pub const AUTH_HEADER: &str = "Authorization-Key";

#[cfg(test)]
pub(crate) mod testing;
