//! The `Warehouse` trait and the flat row model it writes.
//!
//! The trait is implemented by storage backends (e.g. `usjobs-store-sqlite`).
//! The ETL layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single column value, mirroring SQLite's storage classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
}

impl Value {
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Integer(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Real(f) => Some(*f),
      Value::Integer(i) => Some(*i as f64),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool { matches!(self, Value::Null) }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self { Value::Integer(v) }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self { Value::Real(v) }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self { Value::Integer(i64::from(v)) }
}

impl From<String> for Value {
  fn from(v: String) -> Self { Value::Text(v) }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self { Value::Text(v.to_owned()) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Value::Null, Into::into) }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// An ordered list of `(column, value)` pairs destined for one table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
  columns: Vec<(&'static str, Value)>,
}

impl Row {
  pub fn new() -> Self { Self::default() }

  /// Append a column. Builder-style so records can describe themselves in
  /// one expression.
  pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
    self.columns.push((column, value.into()));
    self
  }

  pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.columns.iter().map(|(c, _)| *c)
  }

  pub fn values(&self) -> impl Iterator<Item = &Value> {
    self.columns.iter().map(|(_, v)| v)
  }

  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .columns
      .iter()
      .find(|(c, _)| *c == column)
      .map(|(_, v)| v)
  }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }

  pub fn into_values(self) -> Vec<Value> {
    self.columns.into_iter().map(|(_, v)| v).collect()
  }
}

/// A warehouse entity with a fixed destination table and natural key.
pub trait Record {
  const TABLE: &'static str;
  /// Columns forming the upsert conflict target.
  const CONFLICT_KEY: &'static [&'static str];

  fn to_row(&self) -> Row;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The narrow interface the ETL needs from its storage engine.
///
/// Writes are transactional: a backend opens a transaction on the first
/// write and keeps it open until [`commit`](Warehouse::commit) or
/// [`rollback`](Warehouse::rollback). Connecting is backend-specific and
/// lives on the concrete type.
pub trait Warehouse: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run an idempotent schema statement.
  fn execute_ddl<'a>(
    &'a self,
    statement: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Insert-or-replace `rows` into `table`, keyed by `conflict_key`.
  ///
  /// The batch is atomic: either every row is written or none is, and the
  /// error identifies the offending row. Returns the number of rows written.
  fn upsert_batch<'a>(
    &'a self,
    table: &'a str,
    rows: Vec<Row>,
    conflict_key: &'a [&'a str],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Run a query and return its first row, if any.
  fn query_row<'a>(
    &'a self,
    sql: &'a str,
    params: Vec<Value>,
  ) -> impl Future<Output = Result<Option<Vec<Value>>, Self::Error>> + Send + 'a;

  fn commit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn rollback(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Release the connection. Best-effort: failures are logged by the
  /// backend and never reach the caller.
  fn close(self) -> impl Future<Output = ()> + Send
  where
    Self: Sized;
}

/// Upsert a slice of records into their table.
pub async fn upsert_records<W, R>(warehouse: &W, records: &[R]) -> Result<usize, W::Error>
where
  W: Warehouse,
  R: Record,
{
  let rows = records.iter().map(Record::to_row).collect();
  warehouse.upsert_batch(R::TABLE, rows, R::CONFLICT_KEY).await
}
