//! usjobs-etl binary.
//!
//! Reads the JSON parameter file (`params.txt`, or the path given with
//! `--config`), refreshes the SQLite warehouse and exits. Failures end the
//! process with a non-zero status and the error chain on stderr.
//!
//! ```
//! usjobs-etl --config params.txt --keyword "Data Engineer" --keyword "Data Scientist"
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
use usjobs_etl::{EtlConfig, pipeline};

#[derive(Parser)]
#[command(author, version, about = "Refresh the usjobs warehouse from the job search API")]
struct Cli {
  /// Path to the JSON parameter file.
  #[arg(short, long, default_value = "params.txt")]
  config: PathBuf,

  /// Search keyword; repeat to search several. Replaces `keywords` from the
  /// parameter file.
  #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
  keywords: Vec<String>,

  /// Stop each keyword search after this many pages.
  #[arg(long, value_name = "N")]
  max_pages: Option<u32>,

  /// Warehouse file; overrides `database_path`.
  #[arg(long, value_name = "PATH", env = "USJOBS_DATABASE")]
  database: Option<PathBuf>,
}

impl Cli {
  fn apply(self, config: &mut EtlConfig) {
    if !self.keywords.is_empty() {
      config.keywords = self.keywords;
    }
    if self.max_pages.is_some() {
      config.max_pages = self.max_pages;
    }
    if let Some(database) = self.database {
      config.database_path = database;
    }
  }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut config = EtlConfig::load(&cli.config)
    .with_context(|| format!("failed to load parameters from {}", cli.config.display()))?;
  cli.apply(&mut config);
  config.validate().context("invalid parameters after CLI overrides")?;

  let report = pipeline::run(&config).await.context("ETL run failed")?;

  info!(
    run_id = %report.run_id,
    lookup_codes = report.lookup_codes,
    keywords = report.keywords.len(),
    "run complete"
  );
  for kw in &report.keywords {
    info!(keyword = %kw.keyword, pages = kw.pages, items = kw.items, "keyword summary");
  }

  Ok(())
}
