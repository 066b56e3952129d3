//! Error type for `usjobs-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The store could not be opened or configured. Fatal to a run.
  #[error("cannot open warehouse at {path}: {source}")]
  Connection {
    path:   String,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("invalid SQL identifier: {0:?}")]
  InvalidIdentifier(String),

  /// Every row of a batch must carry the first row's columns, in order.
  #[error("row {index} of the {table} batch does not match the first row's columns")]
  RowShape { table: String, index: usize },

  /// A row was rejected; nothing from its batch was written.
  #[error("upsert into {table} failed at row {index}: {source}")]
  Batch {
    table:  String,
    index:  usize,
    #[source]
    source: rusqlite::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
