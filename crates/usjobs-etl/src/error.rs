//! Error type for `usjobs-etl`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(String),

  #[error("cannot load configuration: {0}")]
  ConfigSource(#[from] config::ConfigError),

  #[error("cannot connect to warehouse: {0}")]
  Connect(#[source] usjobs_store_sqlite::Error),

  #[error(transparent)]
  Client(#[from] usjobs_client::Error),

  #[error(transparent)]
  Core(#[from] usjobs_core::Error),

  #[error("warehouse error: {0}")]
  Warehouse(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error. Backends are generic, so their error type is erased
  /// at this layer.
  pub fn warehouse(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Warehouse(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
