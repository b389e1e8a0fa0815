//! Source-table column introspection.

use mysql_async::prelude::*;
use mysql_async::Transaction;
use tracing::debug;

use crate::error::{ReworkError, Result};
use crate::typemap::ValueKind;

/// One transferable column: its name plus the binding kind resolved from the
/// type MySQL reports for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub name: String,
    pub kind: ValueKind,
}

/// Resolve the transferable columns of `table` in ordinal order, dropping
/// every column named in `excluded` (exact match).
///
/// # Errors
///
/// `SchemaNotFound` when no column metadata comes back at all (missing
/// table, wrong database, insufficient privilege); `UnsupportedColumnType`
/// when a remaining column's reported type is outside the fixed binding
/// table.
pub async fn resolve_columns(
    tx: &mut Transaction<'_>,
    database: &str,
    table: &str,
    excluded: &[String],
) -> Result<Vec<ColumnBinding>> {
    // CAST to CHAR to sidestep collation differences in INFORMATION_SCHEMA
    let query = r#"
        SELECT
            CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME,
            CAST(DATA_TYPE AS CHAR(255)) AS DATA_TYPE
        FROM INFORMATION_SCHEMA.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
    "#;

    let rows: Vec<(String, String)> = tx.exec(query, (database, table)).await?;

    if rows.is_empty() {
        return Err(ReworkError::schema_not_found(table, database));
    }

    let mut columns = Vec::with_capacity(rows.len());
    for (name, data_type) in rows {
        if excluded.iter().any(|e| e == &name) {
            continue;
        }
        let kind = ValueKind::resolve(&data_type)?;
        columns.push(ColumnBinding { name, kind });
    }

    debug!(
        "Resolved {} transferable columns for {}.{}",
        columns.len(),
        database,
        table
    );

    Ok(columns)
}
