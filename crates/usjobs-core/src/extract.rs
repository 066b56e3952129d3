//! Strict JSON-pointer field access for the normalizers.
//!
//! Every accessor either returns the typed value or a
//! [`Error::MalformedRecord`] naming the item and the pointer. An absent path
//! is always an error. `null` is accepted only by the accessors whose result
//! can hold it.

use serde_json::Value;

use crate::{Error, Result, date::string_to_epoch};

pub(crate) struct Fields<'a> {
  item:  &'a Value,
  index: usize,
}

impl<'a> Fields<'a> {
  pub(crate) fn new(item: &'a Value, index: usize) -> Self { Self { item, index } }

  fn malformed(&self, pointer: &str, reason: impl Into<String>) -> Error {
    Error::malformed(Some(self.index), pointer, reason)
  }

  fn present(&self, pointer: &str) -> Result<&'a Value> {
    self
      .item
      .pointer(pointer)
      .ok_or_else(|| self.malformed(pointer, "missing"))
  }

  /// Present and non-null.
  fn get(&self, pointer: &str) -> Result<&'a Value> {
    match self.present(pointer)? {
      Value::Null => Err(self.malformed(pointer, "null")),
      v => Ok(v),
    }
  }

  pub(crate) fn string(&self, pointer: &str) -> Result<String> {
    self
      .nullable_string(pointer)?
      .ok_or_else(|| self.malformed(pointer, "null"))
  }

  /// Text column: the path must exist, but `null` is passed through.
  pub(crate) fn nullable_string(&self, pointer: &str) -> Result<Option<String>> {
    match self.present(pointer)? {
      Value::Null => Ok(None),
      Value::String(s) => Ok(Some(s.clone())),
      Value::Number(n) => Ok(Some(n.to_string())),
      other => Err(self.malformed(pointer, format!("expected a string, got {other}"))),
    }
  }

  /// Integers arrive either as JSON numbers or as decimal strings.
  pub(crate) fn integer(&self, pointer: &str) -> Result<i64> {
    let value = self.get(pointer)?;
    let parsed = match value {
      Value::Number(n) => n.as_i64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    };
    parsed.ok_or_else(|| self.malformed(pointer, format!("expected an integer, got {value}")))
  }

  pub(crate) fn real(&self, pointer: &str) -> Result<f64> {
    let value = self.get(pointer)?;
    let parsed = match value {
      Value::Number(n) => n.as_f64(),
      Value::String(s) => s.trim().parse().ok(),
      _ => None,
    };
    parsed.ok_or_else(|| self.malformed(pointer, format!("expected a number, got {value}")))
  }

  pub(crate) fn epoch(&self, pointer: &str) -> Result<i64> {
    string_to_epoch(&self.string(pointer)?)
  }

  /// Optional timestamp: absent or `null` yields `None`, anything else must
  /// parse.
  pub(crate) fn optional_epoch(&self, pointer: &str) -> Result<Option<i64>> {
    match self.item.pointer(pointer) {
      None | Some(Value::Null) => Ok(None),
      Some(_) => self.epoch(pointer).map(Some),
    }
  }

  /// `"Yes"`/`"No"` flags, as the code-list endpoints spell them.
  pub(crate) fn flag(&self, pointer: &str) -> Result<bool> {
    match self.get(pointer)? {
      Value::Bool(b) => Ok(*b),
      Value::String(s) if s.eq_ignore_ascii_case("yes") => Ok(true),
      Value::String(s) if s.eq_ignore_ascii_case("no") => Ok(false),
      other => Err(self.malformed(pointer, format!("expected Yes/No, got {other}"))),
    }
  }
}

/// Resolve a page-level array, e.g. the list of result items.
pub(crate) fn array<'a>(payload: &'a Value, pointer: &str) -> Result<&'a Vec<Value>> {
  payload
    .pointer(pointer)
    .and_then(Value::as_array)
    .ok_or_else(|| Error::malformed(None, pointer, "expected an array"))
}
