//! Core types and trait definitions for the usjobs warehouse ETL.
//!
//! This crate is free of HTTP and database dependencies. It owns the
//! warehouse row model, the JSON-to-row normalizers and the [`Warehouse`]
//! seam that storage backends implement.

// Native `async fn` in traits; the `Send` bounds are spelled out on the trait.
#![allow(async_fn_in_trait)]

pub mod codelist;
pub mod date;
pub mod error;
pub mod model;
pub mod normalize;
pub mod warehouse;

mod extract;

pub use error::{Error, Result};
pub use warehouse::{Record, Row, Value, Warehouse};
