//! [`SqliteWarehouse`], the SQLite implementation of [`Warehouse`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value as SqlValue};
use tracing::{debug, warn};
use usjobs_core::{Row, Value, Warehouse};

use crate::{
  Error, Result,
  schema::PRAGMAS,
  sql::{from_sql, to_sql, upsert_statement},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A warehouse backed by a single SQLite file.
///
/// Owned by one ETL run. Writes accumulate in an implicit transaction until
/// [`Warehouse::commit`] or [`Warehouse::rollback`].
pub struct SqliteWarehouse {
  conn: tokio_rusqlite::Connection,
  path: String,
}

impl SqliteWarehouse {
  /// Open (or create) a warehouse at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let display = path.as_ref().display().to_string();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|source| Error::Connection { path: display.clone(), source })?;
    Self::configure(conn, display).await
  }

  /// Open an in-memory warehouse. Used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let path = ":memory:".to_owned();
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|source| Error::Connection { path: path.clone(), source })?;
    Self::configure(conn, path).await
  }

  async fn configure(conn: tokio_rusqlite::Connection, path: String) -> Result<Self> {
    // SQLite opens lazily; the pragmas are the first real touch of the file.
    if let Err(source) = conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await
    {
      return Err(Error::Connection { path, source });
    }
    debug!(%path, "warehouse opened");
    Ok(Self { conn, path })
  }

  pub fn path(&self) -> &str { &self.path }

  /// Close the connection, reporting a failure instead of logging it.
  pub async fn try_close(self) -> Result<()> {
    self.conn.close().await?;
    debug!(path = %self.path, "warehouse closed");
    Ok(())
  }
}

/// Open a transaction unless one is already running.
fn begin_if_needed(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  if conn.is_autocommit() {
    conn.execute_batch("BEGIN")?;
  }
  Ok(())
}

// ─── Warehouse impl ──────────────────────────────────────────────────────────

impl Warehouse for SqliteWarehouse {
  type Error = Error;

  async fn execute_ddl(&self, statement: &str) -> Result<()> {
    let sql = statement.to_owned();
    self
      .conn
      .call(move |conn| {
        begin_if_needed(conn)?;
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn upsert_batch(
    &self,
    table: &str,
    rows: Vec<Row>,
    conflict_key: &[&str],
  ) -> Result<usize> {
    let columns: Vec<&'static str> = match rows.first() {
      Some(first) => first.columns().collect(),
      None => return Ok(0),
    };
    if let Some(index) = rows
      .iter()
      .position(|r| !r.columns().eq(columns.iter().copied()))
    {
      return Err(Error::RowShape { table: table.to_owned(), index });
    }

    let sql = upsert_statement(table, &columns, conflict_key)?;
    let batch: Vec<Vec<SqlValue>> = rows
      .into_iter()
      .map(|r| r.into_values().into_iter().map(to_sql).collect())
      .collect();

    // The inner Result carries row-level failures out of the closure without
    // turning them into connection errors.
    let outcome = self
      .conn
      .call(move |conn| {
        begin_if_needed(conn)?;
        let savepoint = conn.savepoint()?;
        let failure = {
          let mut stmt = savepoint.prepare(&sql)?;
          batch.iter().enumerate().find_map(|(index, values)| {
            stmt
              .execute(rusqlite::params_from_iter(values.iter()))
              .err()
              .map(|e| (index, e))
          })
        };
        match failure {
          // Dropping the savepoint rolls the whole batch back.
          Some(failure) => Ok(Err(failure)),
          None => {
            savepoint.commit()?;
            Ok(Ok(batch.len()))
          }
        }
      })
      .await?;

    let written = outcome.map_err(|(index, source)| Error::Batch {
      table: table.to_owned(),
      index,
      source,
    })?;
    debug!(table, rows = written, "batch upserted");
    Ok(written)
  }

  async fn query_row(&self, sql: &str, params: Vec<Value>) -> Result<Option<Vec<Value>>> {
    let sql = sql.to_owned();
    let params: Vec<SqlValue> = params.into_iter().map(to_sql).collect();

    let raw: Option<Vec<SqlValue>> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
              (0..row.as_ref().column_count())
                .map(|i| row.get::<_, SqlValue>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
            })
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(|values| values.into_iter().map(from_sql).collect()))
  }

  async fn commit(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          conn.execute_batch("COMMIT")?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn rollback(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn close(self) {
    let path = self.path.clone();
    if let Err(e) = self.try_close().await {
      warn!(%path, error = %e, "failed to close warehouse; ignoring");
    }
  }
}
