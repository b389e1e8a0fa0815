//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration structure: every production line this tool can
/// operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configured production lines.
    pub lines: Vec<LineConfig>,
}

impl Config {
    /// Look up a line by name, case-insensitively (names are typed by
    /// operators).
    pub fn line(&self, name: &str) -> Option<&LineConfig> {
        self.lines
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }
}

/// One production line: its database target, table layout and the status
/// codes an operator may assign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Display name the operator selects the line by.
    pub name: String,

    /// End-of-line database to connect to.
    pub connection: ConnectionConfig,

    /// Table holding the record to archive (read, then deleted).
    pub source_table: TableSpec,

    /// Table receiving the archived record plus the status annotation.
    pub destination_table: TableSpec,

    /// Tables other than the source purged of related rows in the same
    /// transaction.
    pub auxiliary_tables: Vec<TableSpec>,

    /// Status codes the operator may pick from.
    pub status_codes: Vec<StatusCode>,

    /// Columns never carried over into the destination table.
    pub excluded_columns: Vec<String>,
}

impl LineConfig {
    /// Look up a status code by its key.
    pub fn status(&self, key: i32) -> Option<&StatusCode> {
        self.status_codes.iter().find(|s| s.key == key)
    }
}

/// Connection parameters for one line's database.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Username.
    pub username: String,

    /// Password. Never serialized back out and redacted from Debug output.
    #[serde(skip_serializing)]
    pub password: String,

    /// Database name.
    pub database: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .finish()
    }
}

/// A table plus the columns used to identify one record in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name.
    pub table: String,

    /// One or two key columns: the mandatory primary key first, then the
    /// optional secondary key. Further entries are ignored.
    pub key_columns: Vec<String>,
}

impl TableSpec {
    /// The mandatory primary key column.
    pub fn primary_key(&self) -> Option<&str> {
        self.key_columns.first().map(String::as_str)
    }

    /// The optional secondary key column, if one is configured with a
    /// non-blank name.
    pub fn secondary_key(&self) -> Option<&str> {
        self.key_columns
            .get(1)
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
    }
}

/// One selectable outcome classification for the end-of-line test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCode {
    /// Integer written into the destination table's status column.
    pub key: i32,

    /// Operator-facing label.
    pub label: String,
}

// Default value functions for serde
fn default_mysql_port() -> u16 {
    3306
}
