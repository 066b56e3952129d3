//! The run orchestrator.
//!
//! A run moves through
//! `Start → Connected → SchemaReady → LookupsLoaded → SearchComplete → Closed`
//! strictly in order. Any failure aborts the run after rolling back the open
//! unit of work; the warehouse is closed on every exit path. There is no
//! checkpointing: a failed run is simply re-run, which upserts make safe.

use chrono::Utc;
use tracing::{Instrument as _, error, info, info_span, warn};
use usjobs_client::{ReqwestTransport, RetryClient, Transport};
use usjobs_core::Warehouse;
use usjobs_store_sqlite::{SqliteWarehouse, schema::DDL};
use uuid::Uuid;

use crate::{
  EtlConfig, Error, Result,
  lookup::LookupImporter,
  search::{KeywordReport, SearchLoader},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
  Start,
  Connected,
  SchemaReady,
  LookupsLoaded,
  SearchComplete,
  Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
  pub run_id:        Uuid,
  /// Epoch seconds stamped on every fact row of this run.
  pub run_timestamp: i64,
  pub lookup_codes:  usize,
  pub keywords:      Vec<KeywordReport>,
  /// Last state reached.
  pub state:         RunState,
}

/// Sequences the phases of one run against an already-connected warehouse.
pub struct Pipeline<'a, T> {
  config:        &'a EtlConfig,
  client:        &'a RetryClient<T>,
  run_id:        Uuid,
  run_timestamp: i64,
}

impl<'a, T: Transport> Pipeline<'a, T> {
  pub fn new(config: &'a EtlConfig, client: &'a RetryClient<T>) -> Self {
    Self {
      config,
      client,
      run_id: Uuid::new_v4(),
      run_timestamp: Utc::now().timestamp(),
    }
  }

  /// Pin the fact timestamp instead of using the wall clock.
  pub fn with_run_timestamp(mut self, run_timestamp: i64) -> Self {
    self.run_timestamp = run_timestamp;
    self
  }

  pub fn run_id(&self) -> Uuid { self.run_id }

  /// Run every phase after `Connected`. On failure the uncommitted unit is
  /// rolled back (best-effort) and the error propagates.
  pub async fn execute<W: Warehouse>(&self, warehouse: &W) -> Result<RunReport> {
    let mut report = RunReport {
      run_id:        self.run_id,
      run_timestamp: self.run_timestamp,
      lookup_codes:  0,
      keywords:      Vec::new(),
      state:         RunState::Connected,
    };

    match self.phases(warehouse, &mut report).await {
      Ok(()) => Ok(report),
      Err(e) => {
        error!(state = ?report.state, error = %e, "run aborted");
        if let Err(rb) = warehouse.rollback().await {
          warn!(error = %rb, "rollback after failure also failed");
        }
        Err(e)
      }
    }
  }

  async fn phases<W: Warehouse>(&self, warehouse: &W, report: &mut RunReport) -> Result<()> {
    for statement in DDL {
      warehouse
        .execute_ddl(statement)
        .await
        .map_err(Error::warehouse)?;
    }
    warehouse.commit().await.map_err(Error::warehouse)?;
    advance(report, RunState::SchemaReady);

    report.lookup_codes = LookupImporter::new(self.client, &self.config.authorization_key)
      .import(&self.config.job_category_url, warehouse)
      .await?;
    advance(report, RunState::LookupsLoaded);

    let loader = SearchLoader::new(self.client, self.config);
    for keyword in &self.config.keywords {
      let kw = loader
        .load_keyword(keyword, self.run_timestamp, warehouse)
        .await?;
      report.keywords.push(kw);
    }
    advance(report, RunState::SearchComplete);

    Ok(())
  }
}

fn advance(report: &mut RunReport, state: RunState) {
  report.state = state;
  info!(?state, "run state advanced");
}

/// Connect to the configured warehouse, execute a full run with `client`,
/// and close the warehouse whatever the outcome.
pub async fn run_with<T: Transport>(
  config: &EtlConfig,
  client: &RetryClient<T>,
) -> Result<RunReport> {
  let pipeline = Pipeline::new(config, client);
  let span = info_span!("etl_run", run_id = %pipeline.run_id());

  async move {
    info!(state = ?RunState::Start, keywords = config.keywords.len(), "run starting");
    let warehouse = SqliteWarehouse::open(&config.database_path)
      .await
      .map_err(Error::Connect)?;
    info!(state = ?RunState::Connected, path = warehouse.path(), "run state advanced");

    let result = pipeline.execute(&warehouse).await;

    warehouse.close().await;
    info!(state = ?RunState::Closed, "run state advanced");

    result.map(|mut report| {
      report.state = RunState::Closed;
      report
    })
  }
  .instrument(span)
  .await
}

/// Full production run over HTTPS.
pub async fn run(config: &EtlConfig) -> Result<RunReport> {
  let transport = ReqwestTransport::new(config.verify_tls)?;
  let client = RetryClient::new(transport, config.retry_policy());
  run_with(config, &client).await
}
