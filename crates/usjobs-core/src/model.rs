//! Warehouse entities produced by normalization.

use crate::warehouse::{Record, Row};

/// Table names as they appear in the warehouse DDL.
pub mod tables {
  pub const DIM_ORGANIZATION: &str = "dimorganization";
  pub const REL_JOB_CATEGORY: &str = "reljobcategory";
  pub const LOOKUP_JOB_CATEGORY: &str = "LookUpJobCategory";
  pub const DIM_JOBS: &str = "dimjobs";
  pub const FACT_JOB_SEARCH: &str = "FactJobSearch";
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// One entry of a code-list endpoint.
///
/// Codes are never deleted; a retired code comes back with `disabled` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupCode {
  pub code:          String,
  pub display_value: String,
  pub family:        String,
  /// Epoch seconds.
  pub last_modified: i64,
  pub disabled:      bool,
}

impl Record for LookupCode {
  const TABLE: &'static str = tables::LOOKUP_JOB_CATEGORY;
  const CONFLICT_KEY: &'static [&'static str] = &["jobcategorycode"];

  fn to_row(&self) -> Row {
    Row::new()
      .with("jobcategorycode", self.code.as_str())
      .with("jobcategoryname", self.display_value.as_str())
      .with("jobcategorylastmodified", self.last_modified)
      .with("jobcategorydisabled", self.disabled)
      .with("jobfamily", self.family.as_str())
  }
}

// ─── Search results ──────────────────────────────────────────────────────────

/// A job posting flattened from one search result item. Dates are epoch
/// seconds; text columns are `None` where the API sent `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem {
  pub matched_object_id:      i64,
  pub position_id:            Option<String>,
  pub position_title:         Option<String>,
  pub organization_name:      Option<String>,
  pub job_grade:              Option<String>,
  pub minimum_range:          f64,
  pub maximum_range:          f64,
  pub rate_interval_code:     Option<String>,
  pub position_start_date:    i64,
  pub position_end_date:      Option<i64>,
  pub publication_start_date: Option<i64>,
  pub application_close_date: Option<i64>,
  pub low_grade:              i64,
  pub high_grade:             i64,
  pub organization_codes:     Option<String>,
  pub security_clearance:     Option<String>,
}

impl Record for SearchResultItem {
  const TABLE: &'static str = tables::DIM_JOBS;
  const CONFLICT_KEY: &'static [&'static str] = &["objectid"];

  fn to_row(&self) -> Row {
    Row::new()
      .with("objectid", self.matched_object_id)
      .with("positionid", self.position_id.as_deref())
      .with("positiontitle", self.position_title.as_deref())
      .with("organizationname", self.organization_name.as_deref())
      .with("jobgrade", self.job_grade.as_deref())
      .with("minimumrange", self.minimum_range)
      .with("maximumrange", self.maximum_range)
      .with("rateintervalcode", self.rate_interval_code.as_deref())
      .with("positionstartdate", self.position_start_date)
      .with("positionenddate", self.position_end_date)
      .with("publicationstartdate", self.publication_start_date)
      .with("applicationclosedate", self.application_close_date)
      .with("lowgrade", self.low_grade)
      .with("highgrade", self.high_grade)
      .with("organizationcodes", self.organization_codes.as_deref())
      .with("securityclearance", self.security_clearance.as_deref())
  }
}

/// Records that a search for `keyword` at `timestamp` returned an object.
///
/// Keyed on all three columns: rewriting a page within one run is a no-op,
/// while every new run appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSearchFact {
  pub keyword:           String,
  pub timestamp:         i64,
  pub matched_object_id: i64,
}

impl JobSearchFact {
  pub fn for_item(keyword: &str, timestamp: i64, item: &SearchResultItem) -> Self {
    Self {
      keyword: keyword.to_owned(),
      timestamp,
      matched_object_id: item.matched_object_id,
    }
  }
}

impl Record for JobSearchFact {
  const TABLE: &'static str = tables::FACT_JOB_SEARCH;
  const CONFLICT_KEY: &'static [&'static str] =
    &["keyword", "timestamp", "matchedobjectid"];

  fn to_row(&self) -> Row {
    Row::new()
      .with("keyword", self.keyword.as_str())
      .with("timestamp", self.timestamp)
      .with("matchedobjectid", self.matched_object_id)
  }
}

// ─── Organizations ───────────────────────────────────────────────────────────

/// Reference dimension for hiring organizations. The schema is provisioned
/// but no endpoint feeds it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
  pub code:          String,
  pub name:          String,
  pub acronym:       Option<String>,
  pub parent_code:   Option<String>,
  pub last_modified: i64,
  pub disabled:      bool,
}

impl Record for Organization {
  const TABLE: &'static str = tables::DIM_ORGANIZATION;
  const CONFLICT_KEY: &'static [&'static str] = &["organizationcode"];

  fn to_row(&self) -> Row {
    Row::new()
      .with("organizationcode", self.code.as_str())
      .with("organizationname", self.name.as_str())
      .with("organizationacronym", self.acronym.as_deref())
      .with("parentorganizationcode", self.parent_code.as_deref())
      .with("organizationlastmodified", self.last_modified)
      .with("organizationisdisabled", self.disabled)
  }
}
