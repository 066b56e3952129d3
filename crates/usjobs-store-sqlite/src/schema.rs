//! SQL schema for the usjobs warehouse.
//!
//! Every statement is idempotent thanks to `IF NOT EXISTS`, so provisioning
//! runs at the start of every ETL run.

/// Connection-level settings, applied once at open outside any transaction.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Warehouse DDL, in provisioning order.
pub const DDL: &[&str] = &[
  "CREATE TABLE IF NOT EXISTS dimorganization (
    organizationcode         TEXT PRIMARY KEY,
    organizationname         TEXT,
    organizationacronym      TEXT,
    parentorganizationcode   TEXT,
    organizationlastmodified INTEGER,   -- epoch seconds
    organizationisdisabled   INTEGER    -- 0 | 1
  )",
  "CREATE TABLE IF NOT EXISTS reljobcategory (
    jobobjectid   INTEGER,
    jobcategory   TEXT,
    refreshedtime INTEGER
  )",
  "CREATE TABLE IF NOT EXISTS LookUpJobCategory (
    jobcategorycode         TEXT PRIMARY KEY,
    jobcategoryname         TEXT,
    jobcategorylastmodified INTEGER,
    jobcategorydisabled     INTEGER,
    jobfamily               TEXT
  )",
  "CREATE TABLE IF NOT EXISTS dimjobs (
    objectid             INTEGER PRIMARY KEY,
    positionid           TEXT,
    positiontitle        TEXT,
    organizationname     TEXT,
    jobgrade             TEXT,
    minimumrange         REAL,
    maximumrange         REAL,
    rateintervalcode     TEXT,
    positionstartdate    INTEGER,
    positionenddate      INTEGER,
    publicationstartdate INTEGER,
    applicationclosedate INTEGER,
    lowgrade             INTEGER,
    highgrade            INTEGER,
    organizationcodes    TEXT,
    securityclearance    TEXT
  )",
  // References dimjobs by intent only; rows may land before their dimension.
  "CREATE TABLE IF NOT EXISTS FactJobSearch (
    keyword         TEXT    NOT NULL,
    timestamp       INTEGER NOT NULL,
    matchedobjectid INTEGER NOT NULL,
    PRIMARY KEY (keyword, timestamp, matchedobjectid)
  )",
  "CREATE INDEX IF NOT EXISTS factjobsearch_object_idx ON FactJobSearch(matchedobjectid)",
];

/// Tables created by [`DDL`].
pub const TABLES: &[&str] = &[
  usjobs_core::model::tables::DIM_ORGANIZATION,
  usjobs_core::model::tables::REL_JOB_CATEGORY,
  usjobs_core::model::tables::LOOKUP_JOB_CATEGORY,
  usjobs_core::model::tables::DIM_JOBS,
  usjobs_core::model::tables::FACT_JOB_SEARCH,
];
