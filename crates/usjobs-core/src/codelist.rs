//! Parsing of code-list ("lookup") endpoint payloads.
//!
//! Payloads are shaped `{"CodeList": [{"ValidValue": [ {..}, .. ]}]}`. Only
//! the first code list is read.

use serde_json::Value;

use crate::{
  Result,
  extract::{Fields, array},
  model::LookupCode,
};

pub const VALID_VALUES: &str = "/CodeList/0/ValidValue";

/// Map every `ValidValue` entry to a [`LookupCode`].
///
/// A single malformed entry rejects the whole payload.
pub fn parse_code_list(payload: &Value) -> Result<Vec<LookupCode>> {
  array(payload, VALID_VALUES)?
    .iter()
    .enumerate()
    .map(|(index, entry)| {
      let f = Fields::new(entry, index);
      Ok(LookupCode {
        code:          f.string("/Code")?,
        display_value: f.string("/Value")?,
        family:        f.string("/JobFamily")?,
        last_modified: f.epoch("/LastModified")?,
        disabled:      f.flag("/IsDisabled")?,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::Error;

  fn payload(entries: Value) -> Value {
    json!({ "CodeList": [{ "id": "OCCUPATIONALSERIES", "ValidValue": entries }] })
  }

  #[test]
  fn parses_valid_values() {
    let codes = parse_code_list(&payload(json!([
      {
        "Code": "EN", "Value": "Engineering", "JobFamily": "0800",
        "LastModified": "2023-01-01T00:00:00", "IsDisabled": "No"
      },
      {
        "Code": "0301", "Value": "Miscellaneous Administration", "JobFamily": "0300",
        "LastModified": "2022-06-30T12:15:00.117", "IsDisabled": "Yes"
      }
    ])))
    .unwrap();

    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0], LookupCode {
      code:          "EN".into(),
      display_value: "Engineering".into(),
      family:        "0800".into(),
      last_modified: 1_672_531_200,
      disabled:      false,
    });
    assert!(codes[1].disabled);
  }

  #[test]
  fn empty_list_is_fine() {
    assert!(parse_code_list(&payload(json!([]))).unwrap().is_empty());
  }

  #[test]
  fn missing_code_list_is_malformed() {
    let err = parse_code_list(&json!({ "Other": [] })).unwrap_err();
    assert!(matches!(
      err,
      Error::MalformedRecord { index: None, ref pointer, .. } if pointer == VALID_VALUES
    ));
  }

  #[test]
  fn missing_field_rejects_payload() {
    let err = parse_code_list(&payload(json!([
      { "Code": "EN", "Value": "Engineering", "LastModified": "2023-01-01T00:00:00", "IsDisabled": "No" }
    ])))
    .unwrap_err();
    assert!(matches!(
      err,
      Error::MalformedRecord { index: Some(0), ref pointer, .. } if pointer == "/JobFamily"
    ));
  }
}
