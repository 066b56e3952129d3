//! Code-list ("lookup") import.

use tracing::info;
use usjobs_client::{RetryClient, Transport, fetch_json};
use usjobs_core::{Warehouse, codelist::parse_code_list, warehouse::upsert_records};

use crate::{Error, Result};

/// Fetches a code-list endpoint and upserts it into its lookup table.
pub struct LookupImporter<'a, T> {
  client:   &'a RetryClient<T>,
  auth_key: &'a str,
}

impl<'a, T: Transport> LookupImporter<'a, T> {
  pub fn new(client: &'a RetryClient<T>, auth_key: &'a str) -> Self { Self { client, auth_key } }

  /// Import the code list at `url` and commit it as one unit.
  ///
  /// Re-importing the same payload leaves the table unchanged.
  pub async fn import<W: Warehouse>(&self, url: &str, warehouse: &W) -> Result<usize> {
    let payload = fetch_json(self.client, url, self.auth_key).await?;
    let codes = parse_code_list(&payload)?;

    let written = upsert_records(warehouse, &codes)
      .await
      .map_err(Error::warehouse)?;
    warehouse.commit().await.map_err(Error::warehouse)?;

    info!(url, codes = written, "lookup table refreshed");
    Ok(written)
  }
}
