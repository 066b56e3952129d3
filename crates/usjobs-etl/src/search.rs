//! Keyword search loading: paginate, normalize, upsert.

use tracing::{debug, info};
use usjobs_client::{RetryClient, SearchPaginator, Transport};
use usjobs_core::{
  Warehouse,
  model::JobSearchFact,
  normalize::normalize,
  warehouse::upsert_records,
};

use crate::{EtlConfig, Error, Result};

/// What one keyword search contributed to the warehouse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordReport {
  pub keyword: String,
  /// Pages fetched, including the final zero-count page.
  pub pages:   u32,
  pub items:   usize,
}

pub struct SearchLoader<'a, T> {
  client: &'a RetryClient<T>,
  config: &'a EtlConfig,
}

impl<'a, T: Transport> SearchLoader<'a, T> {
  pub fn new(client: &'a RetryClient<T>, config: &'a EtlConfig) -> Self { Self { client, config } }

  /// Walk every page for `keyword`, writing each page's jobs and facts and
  /// committing per page. A malformed page aborts the keyword; pages already
  /// committed stay.
  pub async fn load_keyword<W: Warehouse>(
    &self,
    keyword: &str,
    run_timestamp: i64,
    warehouse: &W,
  ) -> Result<KeywordReport> {
    let mut paginator = SearchPaginator::new(
      self.client,
      self.config.search_url.as_str(),
      keyword,
      self.config.results_per_page,
      self.config.authorization_key.as_str(),
    )
    .with_max_pages(self.config.max_pages);

    let mut report = KeywordReport { keyword: keyword.to_owned(), ..Default::default() };

    while let Some(page) = paginator.next_page().await? {
      let (jobs, _) = normalize(&page.body)?;
      let facts: Vec<JobSearchFact> = jobs
        .iter()
        .map(|job| JobSearchFact::for_item(keyword, run_timestamp, job))
        .collect();

      upsert_records(warehouse, &jobs).await.map_err(Error::warehouse)?;
      upsert_records(warehouse, &facts).await.map_err(Error::warehouse)?;
      warehouse.commit().await.map_err(Error::warehouse)?;

      report.pages += 1;
      report.items += jobs.len();
      debug!(keyword, page = page.page, jobs = jobs.len(), "page loaded");
    }

    info!(keyword, pages = report.pages, items = report.items, "keyword search loaded");
    Ok(report)
  }
}
