//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use mysql_async::{Opts, OptsBuilder};

use crate::error::Result;

/// Commented single-line example, the starting point `init-config` writes.
const SAMPLE_CONFIG: &str = r#"# eol-rework configuration
#
# One entry per production line. The operator picks a line by name; each
# line carries its own database target, table layout and status codes.
lines:
  - name: "Linie 852"
    connection:
      host: 127.0.0.1
      port: 3306
      username: rework
      password: change-me
      database: linie_852
    # Table holding the record to archive. key_columns: primary key first,
    # optional secondary key second.
    source_table:
      table: prad
      key_columns: [Seriennummer, Teilenummer]
    # Table receiving the archived record plus the status annotation.
    destination_table:
      table: prad_rework
      key_columns: [Seriennummer, Teilenummer]
    # Related rows are purged from these tables in the same transaction,
    # each matched by its own key columns.
    auxiliary_tables:
      - table: abblasen
        key_columns: [Seriennummer]
    # Selectable outcomes; the key is written into the status column.
    status_codes:
      - { key: 1, label: "Nacharbeit erfolgreich" }
      - { key: 2, label: "Bauteil getauscht" }
      - { key: 3, label: "Ausschuss" }
    # Columns never carried over into the destination table.
    excluded_columns: [ID, Datum]
"#;

impl Config {
    /// Load configuration from a file. `.json` files parse as JSON,
    /// anything else as YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// The commented sample configuration written by `init-config`.
    pub fn sample_yaml() -> &'static str {
        SAMPLE_CONFIG
    }
}

impl ConnectionConfig {
    /// Build driver options for this connection.
    pub fn opts(&self) -> Opts {
        OptsBuilder::default()
            .ip_or_hostname(&self.host)
            .tcp_port(self.port)
            .db_name(Some(&self.database))
            .user(Some(&self.username))
            .pass(Some(&self.password))
            // Use utf8mb4 for full Unicode support
            .init(vec!["SET NAMES utf8mb4"])
            .into()
    }
}
