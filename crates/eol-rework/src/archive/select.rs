//! Source-row selection.

use mysql_async::prelude::*;
use mysql_async::{Row, Transaction};
use tracing::debug;

use crate::config::TableSpec;
use crate::error::{ReworkError, Result};
use crate::identifier::quote_ident;
use crate::schema::ColumnBinding;

use super::predicate::key_predicate;

/// Fetch every row of `table` matching the record keys, carrying exactly the
/// resolved columns in their resolved order. Zero matches is an error: the
/// record was already archived or the keys are wrong.
pub(crate) async fn select_rows(
    tx: &mut Transaction<'_>,
    table: &TableSpec,
    columns: &[ColumnBinding],
    primary: &str,
    secondary: Option<&str>,
) -> Result<Vec<Row>> {
    let predicate = key_predicate(table, primary, secondary)?;
    let sql = select_statement(&table.table, columns, &predicate.clause)?;
    debug!("Selecting source rows: {}", sql);

    let rows: Vec<Row> = tx.exec(&sql, predicate.params).await?;
    if rows.is_empty() {
        return Err(ReworkError::record_not_found(&table.table));
    }

    debug!("Matched {} row(s) in {}", rows.len(), table.table);
    Ok(rows)
}

fn select_statement(table: &str, columns: &[ColumnBinding], clause: &str) -> Result<String> {
    let column_list = if columns.is_empty() {
        // Every data column excluded; existence still gates the transfer
        "1".to_string()
    } else {
        columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Result<Vec<_>>>()?
            .join(", ")
    };

    Ok(format!(
        "SELECT {} FROM {} WHERE {}",
        column_list,
        quote_ident(table)?,
        clause
    ))
}
