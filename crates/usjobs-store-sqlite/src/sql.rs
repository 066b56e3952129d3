//! Statement building and value conversion between the core row model and
//! rusqlite.
//!
//! Table and column names cannot be bound as parameters, so they are checked
//! against a conservative identifier grammar and quoted before being spliced
//! into SQL text.

use rusqlite::types::Value as SqlValue;
use usjobs_core::Value;

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Accept `[A-Za-z_][A-Za-z0-9_]*` and return it double-quoted.
pub fn quote_identifier(name: &str) -> Result<String> {
  let mut chars = name.chars();
  let head_ok = chars
    .next()
    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
  if !head_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return Err(Error::InvalidIdentifier(name.to_owned()));
  }
  Ok(format!("\"{name}\""))
}

fn quote_all(names: &[&str]) -> Result<Vec<String>> {
  names.iter().map(|n| quote_identifier(n)).collect()
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

/// Build an `INSERT .. ON CONFLICT` statement with positional parameters.
///
/// Non-key columns are overwritten from `excluded`. When every column is part
/// of the key there is nothing to update and the conflict is ignored. An
/// empty key produces a plain append.
pub fn upsert_statement(table: &str, columns: &[&str], conflict_key: &[&str]) -> Result<String> {
  let table = quote_identifier(table)?;
  let cols = quote_all(columns)?;
  let key = quote_all(conflict_key)?;

  let placeholders = (1..=cols.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");

  let mut sql = format!(
    "INSERT INTO {table} ({}) VALUES ({placeholders})",
    cols.join(", ")
  );

  if key.is_empty() {
    return Ok(sql);
  }

  let updates: Vec<String> = cols
    .iter()
    .filter(|c| !key.contains(c))
    .map(|c| format!("{c} = excluded.{c}"))
    .collect();

  sql.push_str(&format!(" ON CONFLICT ({})", key.join(", ")));
  if updates.is_empty() {
    sql.push_str(" DO NOTHING");
  } else {
    sql.push_str(&format!(" DO UPDATE SET {}", updates.join(", ")));
  }
  Ok(sql)
}

// ─── Values ──────────────────────────────────────────────────────────────────

pub fn to_sql(value: Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(i),
    Value::Real(f) => SqlValue::Real(f),
    Value::Text(s) => SqlValue::Text(s),
  }
}

/// Blobs never come from this schema; they are decoded lossily as text.
pub fn from_sql(value: SqlValue) -> Value {
  match value {
    SqlValue::Null => Value::Null,
    SqlValue::Integer(i) => Value::Integer(i),
    SqlValue::Real(f) => Value::Real(f),
    SqlValue::Text(s) => Value::Text(s),
    SqlValue::Blob(b) => Value::Text(String::from_utf8_lossy(&b).into_owned()),
  }
}
