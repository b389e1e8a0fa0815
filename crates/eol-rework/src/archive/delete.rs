//! Cascading deletion of the archived record.

use mysql_async::prelude::*;
use mysql_async::Transaction;
use tracing::debug;

use crate::config::TableSpec;
use crate::error::{ReworkError, Result};
use crate::identifier::quote_ident;

use super::predicate::key_predicate;

/// Remove the archived record from the source table, then purge related rows
/// from every auxiliary table. Returns (source rows, auxiliary rows).
///
/// The source delete must remove at least one row. Auxiliary deletes are
/// checked in aggregate: an individual table matching nothing is tolerated,
/// a zero total across all of them is not.
pub(crate) async fn purge_rows(
    tx: &mut Transaction<'_>,
    source: &TableSpec,
    auxiliaries: &[TableSpec],
    primary: &str,
    secondary: Option<&str>,
) -> Result<(u64, u64)> {
    let source_deleted = delete_matching(tx, source, primary, secondary).await?;
    if source_deleted < 1 {
        return Err(ReworkError::delete_failed(&source.table));
    }

    let mut auxiliary_deleted = 0u64;
    for spec in auxiliaries {
        let affected = delete_matching(tx, spec, primary, secondary).await?;
        if affected == 0 {
            debug!("No related rows in {} for this record", spec.table);
        }
        auxiliary_deleted += affected;
    }
    if auxiliary_deleted == 0 {
        let names = auxiliaries
            .iter()
            .map(|s| s.table.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ReworkError::delete_failed(names));
    }

    Ok((source_deleted, auxiliary_deleted))
}

/// Delete every row of `table` matching the record keys. Each table applies
/// its own key columns, so an auxiliary keyed only by serial number matches
/// more broadly than a source keyed by serial and part.
async fn delete_matching(
    tx: &mut Transaction<'_>,
    table: &TableSpec,
    primary: &str,
    secondary: Option<&str>,
) -> Result<u64> {
    let predicate = key_predicate(table, primary, secondary)?;
    let sql = format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(&table.table)?,
        predicate.clause
    );
    debug!("Deleting: {}", sql);

    tx.exec_drop(&sql, predicate.params).await?;
    Ok(tx.affected_rows())
}
