//! Destination-row insertion.

use mysql_async::prelude::*;
use mysql_async::{Row, Transaction, Value};
use tracing::debug;

use crate::config::TableSpec;
use crate::error::{ReworkError, Result};
use crate::identifier::quote_ident;
use crate::schema::ColumnBinding;

/// Status column every destination table carries after its data columns.
pub const STATUS_COLUMN: &str = "EoL_Test_Status";

/// Insert every selected row into `destination`, appending the status code
/// as the last column. One INSERT per row; the enclosing transaction undoes
/// earlier inserts when a later one fails.
pub(crate) async fn insert_rows(
    tx: &mut Transaction<'_>,
    destination: &TableSpec,
    columns: &[ColumnBinding],
    rows: Vec<Row>,
    status_code: i32,
) -> Result<u64> {
    let sql = insert_statement(&destination.table, columns)?;
    debug!("Archiving {} row(s): {}", rows.len(), sql);

    let mut inserted = 0u64;
    for row in rows {
        // Values arrive in the same order the resolved columns produced them
        let mut params: Vec<Value> = columns
            .iter()
            .zip(row.unwrap())
            .map(|(column, value)| column.kind.bind(value))
            .collect();
        params.push(Value::from(status_code));

        tx.exec_drop(&sql, params).await?;
        let affected = tx.affected_rows();
        if affected < 1 {
            return Err(ReworkError::write_failed(&destination.table));
        }
        inserted += affected;
    }

    Ok(inserted)
}

fn insert_statement(table: &str, columns: &[ColumnBinding]) -> Result<String> {
    let mut column_list: Vec<String> = columns
        .iter()
        .map(|c| quote_ident(&c.name))
        .collect::<Result<_>>()?;
    column_list.push(quote_ident(STATUS_COLUMN)?);

    let placeholders = vec!["?"; column_list.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table)?,
        column_list.join(", "),
        placeholders
    ))
}
