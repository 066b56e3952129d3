//! Error types for `usjobs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field is absent or has the wrong shape. The whole payload is
  /// rejected; no partial page is ever returned.
  #[error("malformed record{}: {pointer}: {reason}", item_label(.index))]
  MalformedRecord {
    index:   Option<usize>,
    pointer: String,
    reason:  String,
  },

  #[error("unrecognised timestamp: {input:?}")]
  DateParse { input: String },
}

impl Error {
  pub(crate) fn malformed(
    index: Option<usize>,
    pointer: &str,
    reason: impl Into<String>,
  ) -> Self {
    Error::MalformedRecord {
      index,
      pointer: pointer.to_owned(),
      reason: reason.into(),
    }
  }
}

fn item_label(index: &Option<usize>) -> String {
  match index {
    Some(i) => format!(" (item {i})"),
    None => String::new(),
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
