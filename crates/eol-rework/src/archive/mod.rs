//! Transactional archive of one end-of-line test record.
//!
//! The coordinator owns the whole unit of work: open one connection, begin
//! one transaction, resolve the source columns, select the matching rows,
//! insert them into the destination with the status code, purge the original
//! and its related rows, commit. Any failure rolls the transaction back and
//! the connection is released on every exit path.

mod delete;
mod insert;
mod predicate;
mod select;

pub use insert::STATUS_COLUMN;

use mysql_async::{Conn, Transaction, TxOpts};
use tracing::{info, warn};

use crate::config::{ConnectionConfig, LineConfig, TableSpec};
use crate::error::Result;
use crate::schema::resolve_columns;

/// Row counts from one successful archive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveOutcome {
    /// Rows written to the destination table.
    pub rows_archived: u64,
    /// Rows removed from the source table.
    pub source_rows_deleted: u64,
    /// Rows removed across all auxiliary tables.
    pub auxiliary_rows_deleted: u64,
}

struct ArchiveRequest<'a> {
    database: &'a str,
    source_table: &'a TableSpec,
    destination_table: &'a TableSpec,
    auxiliary_tables: &'a [TableSpec],
    excluded_columns: &'a [String],
    status_code: i32,
    primary: &'a str,
    secondary: Option<&'a str>,
}

/// Move one record into the archive table and purge it everywhere else,
/// atomically.
///
/// The record is located by `primary_key_value` and, when both the source
/// table defines a second key column and `secondary_key_value` is non-blank,
/// narrowed by that value as well. All matching source rows are copied into
/// `destination_table` with `status_code` appended, then deleted from the
/// source and from every auxiliary table. Either everything happens or
/// nothing does.
#[allow(clippy::too_many_arguments)]
pub async fn store_data_in_db(
    connection: &ConnectionConfig,
    auxiliary_tables: &[TableSpec],
    excluded_columns: &[String],
    status_code: i32,
    primary_key_value: &str,
    source_table: &TableSpec,
    destination_table: &TableSpec,
    secondary_key_value: Option<&str>,
) -> Result<ArchiveOutcome> {
    let request = ArchiveRequest {
        database: &connection.database,
        source_table,
        destination_table,
        auxiliary_tables,
        excluded_columns,
        status_code,
        primary: primary_key_value,
        secondary: normalize_secondary(secondary_key_value),
    };

    info!(
        "Archiving record {} from {}.{} with status {}",
        request.primary, request.database, source_table.table, status_code
    );

    let mut conn = Conn::new(connection.opts()).await?;
    let result = archive_record(&mut conn, &request).await;
    if let Err(err) = conn.disconnect().await {
        warn!("Failed to close connection cleanly: {}", err);
    }
    result
}

/// Archive one record for a configured line, using the line's own tables,
/// exclusions and connection.
pub async fn store_for_line(
    line: &LineConfig,
    status_code: i32,
    primary_key_value: &str,
    secondary_key_value: Option<&str>,
) -> Result<ArchiveOutcome> {
    store_data_in_db(
        &line.connection,
        &line.auxiliary_tables,
        &line.excluded_columns,
        status_code,
        primary_key_value,
        &line.source_table,
        &line.destination_table,
        secondary_key_value,
    )
    .await
}

async fn archive_record(conn: &mut Conn, request: &ArchiveRequest<'_>) -> Result<ArchiveOutcome> {
    let mut tx = conn.start_transaction(TxOpts::default()).await?;

    match run_steps(&mut tx, request).await {
        Ok(outcome) => {
            tx.commit().await?;
            info!(
                "Archived {} row(s) into {} (deleted {} source, {} auxiliary)",
                outcome.rows_archived,
                request.destination_table.table,
                outcome.source_rows_deleted,
                outcome.auxiliary_rows_deleted
            );
            Ok(outcome)
        }
        Err(err) => {
            // The original error wins over any rollback failure
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            Err(err)
        }
    }
}

async fn run_steps(
    tx: &mut Transaction<'_>,
    request: &ArchiveRequest<'_>,
) -> Result<ArchiveOutcome> {
    let columns = resolve_columns(
        tx,
        request.database,
        &request.source_table.table,
        request.excluded_columns,
    )
    .await?;

    let rows = select::select_rows(
        tx,
        request.source_table,
        &columns,
        request.primary,
        request.secondary,
    )
    .await?;

    let rows_archived = insert::insert_rows(
        tx,
        request.destination_table,
        &columns,
        rows,
        request.status_code,
    )
    .await?;

    let (source_rows_deleted, auxiliary_rows_deleted) = delete::purge_rows(
        tx,
        request.source_table,
        request.auxiliary_tables,
        request.primary,
        request.secondary,
    )
    .await?;

    Ok(ArchiveOutcome {
        rows_archived,
        source_rows_deleted,
        auxiliary_rows_deleted,
    })
}

fn normalize_secondary(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
