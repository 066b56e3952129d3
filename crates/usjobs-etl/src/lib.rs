//! Batch ETL that refreshes the usjobs warehouse.
//!
//! A run provisions the schema, reloads the code-list lookups, then walks
//! every page of each configured keyword search into the `dimjobs` dimension
//! and the `FactJobSearch` fact table. See [`pipeline::run`].

pub mod config;
pub mod error;
pub mod lookup;
pub mod pipeline;
pub mod search;

pub use config::EtlConfig;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunReport, RunState};
