//! SQLite backend for the usjobs warehouse.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime.

mod sql;
mod warehouse;

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use warehouse::SqliteWarehouse;
