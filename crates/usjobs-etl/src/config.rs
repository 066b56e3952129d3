//! Run parameters.
//!
//! Loaded from a JSON parameter file (`params.txt` by default), with
//! `USJOBS_`-prefixed environment variables layered on top. The four keys the
//! API integration needs keep the spelling of the parameter file; everything
//! else is optional.

use std::{path::{Path, PathBuf}, time::Duration};

use serde::Deserialize;
use usjobs_client::RetryPolicy;

use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct EtlConfig {
  /// Static API key sent as the `Authorization-Key` header.
  #[serde(rename = "Authorization-Key", alias = "authorization-key")]
  pub authorization_key: String,
  /// Job category code-list endpoint.
  #[serde(rename = "job_category")]
  pub job_category_url:  String,
  pub search_url:        String,
  #[serde(rename = "ResultsPerPage", alias = "resultsperpage")]
  pub results_per_page:  u32,

  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  #[serde(default = "default_keywords")]
  pub keywords:          Vec<String>,
  /// Safety cap on pages per keyword. Unset means "until the server reports
  /// zero results".
  #[serde(default)]
  pub max_pages:         Option<u32>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:      u64,
  #[serde(default = "default_retry_attempts")]
  pub retry_attempts:    u32,
  #[serde(default = "default_retry_wait_secs")]
  pub retry_wait_secs:   u64,
  #[serde(default = "default_verify_tls")]
  pub verify_tls:        bool,
}

fn default_database_path() -> PathBuf { PathBuf::from("usjobs.db") }
fn default_keywords() -> Vec<String> { vec!["Data Engineer".to_owned()] }
fn default_timeout_secs() -> u64 { 60 }
fn default_retry_attempts() -> u32 { 3 }
fn default_retry_wait_secs() -> u64 { 2 }
fn default_verify_tls() -> bool { true }

impl EtlConfig {
  /// Build a config from the required keys, with every optional key at its
  /// default.
  pub fn new(
    authorization_key: impl Into<String>,
    job_category_url: impl Into<String>,
    search_url: impl Into<String>,
    results_per_page: u32,
  ) -> Self {
    Self {
      authorization_key: authorization_key.into(),
      job_category_url:  job_category_url.into(),
      search_url:        search_url.into(),
      results_per_page,
      database_path:     default_database_path(),
      keywords:          default_keywords(),
      max_pages:         None,
      timeout_secs:      default_timeout_secs(),
      retry_attempts:    default_retry_attempts(),
      retry_wait_secs:   default_retry_wait_secs(),
      verify_tls:        default_verify_tls(),
    }
  }

  /// Read and validate the parameter file at `path`.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).format(config::FileFormat::Json))
      .add_source(config::Environment::with_prefix("USJOBS"))
      .build()?;

    let cfg: EtlConfig = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<()> {
    if self.authorization_key.trim().is_empty() {
      return Err(Error::Config("Authorization-Key must not be empty".into()));
    }
    for (name, url) in [("job_category", &self.job_category_url), ("search_url", &self.search_url)] {
      if url.trim().is_empty() {
        return Err(Error::Config(format!("{name} must not be empty")));
      }
    }
    if self.results_per_page == 0 {
      return Err(Error::Config("ResultsPerPage must be at least 1".into()));
    }
    if self.max_pages == Some(0) {
      return Err(Error::Config("max_pages must be at least 1 when set".into()));
    }
    Ok(())
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      retry_attempts: self.retry_attempts,
      backoff:        Duration::from_secs(self.retry_wait_secs),
      timeout:        Duration::from_secs(self.timeout_secs),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn write_params(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
  }

  #[test]
  fn loads_parameter_file_with_defaults() {
    let file = write_params(
      r#"{
        "Authorization-Key": "abc123",
        "job_category": "https://data.example.gov/api/codelist/occupationalseries",
        "search_url": "https://data.example.gov/api/search",
        "ResultsPerPage": 250
      }"#,
    );

    let cfg = EtlConfig::load(file.path()).unwrap();
    assert_eq!(cfg.authorization_key, "abc123");
    assert_eq!(cfg.results_per_page, 250);
    assert_eq!(cfg.keywords, vec!["Data Engineer".to_owned()]);
    assert_eq!(cfg.database_path, PathBuf::from("usjobs.db"));
    assert_eq!(cfg.max_pages, None);
    assert_eq!(cfg.retry_policy(), RetryPolicy::default());
  }

  #[test]
  fn optional_keys_override_defaults() {
    let file = write_params(
      r#"{
        "Authorization-Key": "abc123",
        "job_category": "http://c",
        "search_url": "http://s",
        "ResultsPerPage": 10,
        "keywords": ["Data Engineer", "Data Scientist"],
        "max_pages": 5,
        "retry_attempts": 1,
        "retry_wait_secs": 0,
        "verify_tls": false
      }"#,
    );

    let cfg = EtlConfig::load(file.path()).unwrap();
    assert_eq!(cfg.keywords.len(), 2);
    assert_eq!(cfg.max_pages, Some(5));
    assert!(!cfg.verify_tls);
    assert_eq!(cfg.retry_policy().retry_attempts, 1);
    assert_eq!(cfg.retry_policy().backoff, Duration::ZERO);
  }

  #[test]
  fn missing_required_key_fails() {
    let file = write_params(r#"{ "Authorization-Key": "k", "search_url": "http://s", "ResultsPerPage": 1 }"#);
    assert!(matches!(EtlConfig::load(file.path()), Err(Error::ConfigSource(_))));
  }

  #[test]
  fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(EtlConfig::load(&dir.path().join("params.txt")).is_err());
  }

  #[test]
  fn empty_key_is_rejected() {
    let cfg = EtlConfig::new("  ", "http://c", "http://s", 10);
    assert!(matches!(cfg.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn zero_page_size_is_rejected() {
    let cfg = EtlConfig::new("k", "http://c", "http://s", 0);
    assert!(matches!(cfg.validate(), Err(Error::Config(_))));
  }
}
