//! Search result normalization.
//!
//! Flattens one page of the search endpoint's nested JSON into
//! [`SearchResultItem`] rows by fixed-path extraction. The policy is
//! all-or-nothing per page: the first missing required field aborts the
//! page with [`Error::MalformedRecord`](crate::Error::MalformedRecord).
//! A `null` text field is kept as `None`; a `null` number or start date
//! is rejected.

use serde_json::Value;

use crate::{
  Error, Result,
  extract::{Fields, array},
  model::SearchResultItem,
};

pub const RESULT_COUNT: &str = "/SearchResult/SearchResultCount";
pub const RESULT_ITEMS: &str = "/SearchResult/SearchResultItems";

const DESCRIPTOR: &str = "/MatchedObjectDescriptor";
const REMUNERATION: &str = "/MatchedObjectDescriptor/PositionRemuneration/0";
const DETAILS: &str = "/MatchedObjectDescriptor/UserArea/Details";

/// Number of results the server reports for this page. Zero marks the end of
/// pagination.
pub fn result_count(page: &Value) -> Result<i64> {
  page
    .pointer(RESULT_COUNT)
    .and_then(Value::as_i64)
    .ok_or_else(|| Error::malformed(None, RESULT_COUNT, "expected an integer"))
}

/// Normalize a whole page, returning its items in server order along with
/// the reported result count.
pub fn normalize(page: &Value) -> Result<(Vec<SearchResultItem>, i64)> {
  let count = result_count(page)?;
  let items = array(page, RESULT_ITEMS)?
    .iter()
    .enumerate()
    .map(|(index, item)| normalize_item(&Fields::new(item, index)))
    .collect::<Result<Vec<_>>>()?;
  Ok((items, count))
}

fn normalize_item(f: &Fields<'_>) -> Result<SearchResultItem> {
  let d = |leaf: &str| format!("{DESCRIPTOR}/{leaf}");
  let pay = |leaf: &str| format!("{REMUNERATION}/{leaf}");
  let det = |leaf: &str| format!("{DETAILS}/{leaf}");

  Ok(SearchResultItem {
    matched_object_id:      f.integer("/MatchedObjectId")?,
    position_id:            f.nullable_string(&d("PositionID"))?,
    position_title:         f.nullable_string(&d("PositionTitle"))?,
    organization_name:      f.nullable_string(&d("OrganizationName"))?,
    job_grade:              f.nullable_string(&d("JobGrade/0/Code"))?,
    minimum_range:          f.real(&pay("MinimumRange"))?,
    maximum_range:          f.real(&pay("MaximumRange"))?,
    rate_interval_code:     f.nullable_string(&pay("RateIntervalCode"))?,
    position_start_date:    f.epoch(&d("PositionStartDate"))?,
    position_end_date:      f.optional_epoch(&d("PositionEndDate"))?,
    publication_start_date: f.optional_epoch(&d("PublicationStartDate"))?,
    application_close_date: f.optional_epoch(&d("ApplicationCloseDate"))?,
    low_grade:              f.integer(&det("LowGrade"))?,
    high_grade:             f.integer(&det("HighGrade"))?,
    organization_codes:     f.nullable_string(&det("OrganizationCodes"))?,
    security_clearance:     f.nullable_string(&det("SecurityClearance"))?,
  })
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn item(id: &str) -> Value {
    json!({
      "MatchedObjectId": id,
      "MatchedObjectDescriptor": {
        "PositionID": "ABC-123",
        "PositionTitle": "Data Engineer",
        "OrganizationName": "Department of Examples",
        "JobGrade": [{ "Code": "GS" }],
        "PositionRemuneration": [{
          "MinimumRange": "90000.0",
          "MaximumRange": "120000.0",
          "RateIntervalCode": "PA"
        }],
        "PositionStartDate": "2023-01-05T10:00:00.0000",
        "ApplicationCloseDate": "2023-02-05T23:59:59.9970",
        "UserArea": {
          "Details": {
            "LowGrade": "12",
            "HighGrade": "13",
            "OrganizationCodes": "DE/DE00",
            "SecurityClearance": "Secret"
          }
        }
      }
    })
  }

  fn page(count: i64, items: Vec<Value>) -> Value {
    json!({
      "SearchResult": {
        "SearchResultCount": count,
        "SearchResultCountAll": 120,
        "SearchResultItems": items
      }
    })
  }

  #[test]
  fn flattens_nested_item() {
    let (items, count) = normalize(&page(1, vec![item("712345600")])).unwrap();
    assert_eq!(count, 1);
    let it = &items[0];
    assert_eq!(it.matched_object_id, 712_345_600);
    assert_eq!(it.position_title.as_deref(), Some("Data Engineer"));
    assert_eq!(it.job_grade.as_deref(), Some("GS"));
    assert_eq!(it.minimum_range, 90_000.0);
    assert_eq!(it.rate_interval_code.as_deref(), Some("PA"));
    assert_eq!(it.position_start_date, 1_672_912_800);
    assert_eq!(it.position_end_date, None);
    assert!(it.application_close_date.is_some());
    assert_eq!((it.low_grade, it.high_grade), (12, 13));
    assert_eq!(it.security_clearance.as_deref(), Some("Secret"));
  }

  #[test]
  fn preserves_server_order() {
    let (items, _) = normalize(&page(3, vec![item("3"), item("1"), item("2")])).unwrap();
    let ids: Vec<_> = items.iter().map(|i| i.matched_object_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
  }

  #[test]
  fn empty_final_page() {
    let (items, count) = normalize(&page(0, vec![])).unwrap();
    assert!(items.is_empty());
    assert_eq!(count, 0);
  }

  #[test]
  fn missing_remuneration_aborts_page() {
    let mut bad = item("2");
    bad["MatchedObjectDescriptor"]
      .as_object_mut()
      .unwrap()
      .remove("PositionRemuneration");

    let err = normalize(&page(2, vec![item("1"), bad])).unwrap_err();
    match err {
      Error::MalformedRecord { index, pointer, .. } => {
        assert_eq!(index, Some(1));
        assert!(pointer.contains("PositionRemuneration"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn null_text_field_is_kept_as_none() {
    let mut sparse = item("1");
    sparse["MatchedObjectDescriptor"]["UserArea"]["Details"]["SecurityClearance"] = Value::Null;
    sparse["MatchedObjectDescriptor"]["UserArea"]["Details"]["OrganizationCodes"] = Value::Null;

    let (items, _) = normalize(&page(1, vec![sparse])).unwrap();
    assert_eq!(items[0].security_clearance, None);
    assert_eq!(items[0].organization_codes, None);
    assert_eq!(items[0].position_title.as_deref(), Some("Data Engineer"));
  }

  #[test]
  fn absent_text_field_aborts_page() {
    let mut bad = item("1");
    bad["MatchedObjectDescriptor"]["UserArea"]["Details"]
      .as_object_mut()
      .unwrap()
      .remove("SecurityClearance");

    let err = normalize(&page(1, vec![bad])).unwrap_err();
    assert!(matches!(
      err,
      Error::MalformedRecord { index: Some(0), ref pointer, ref reason }
        if pointer.ends_with("/SecurityClearance") && reason == "missing"
    ));
  }

  #[test]
  fn null_salary_aborts_page() {
    let mut bad = item("1");
    bad["MatchedObjectDescriptor"]["PositionRemuneration"][0]["MinimumRange"] = Value::Null;
    assert!(matches!(
      normalize(&page(1, vec![bad])),
      Err(Error::MalformedRecord { index: Some(0), .. })
    ));
  }

  #[test]
  fn bad_start_date_is_a_date_error() {
    let mut bad = item("1");
    bad["MatchedObjectDescriptor"]["PositionStartDate"] = json!("next tuesday");
    assert!(matches!(
      normalize(&page(1, vec![bad])),
      Err(Error::DateParse { .. })
    ));
  }

  #[test]
  fn missing_count_is_malformed() {
    let err = normalize(&json!({ "SearchResult": { "SearchResultItems": [] } })).unwrap_err();
    assert!(matches!(
      err,
      Error::MalformedRecord { index: None, ref pointer, .. } if pointer == RESULT_COUNT
    ));
  }
}
