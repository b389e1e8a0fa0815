//! Configuration validation.

use super::{Config, LineConfig, TableSpec};
use crate::error::{ReworkError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.lines.is_empty() {
        return Err(ReworkError::Config(
            "no lines defined in configuration".into(),
        ));
    }

    for (idx, line) in config.lines.iter().enumerate() {
        if line.name.trim().is_empty() {
            return Err(ReworkError::Config(format!(
                "lines[{}].name is required",
                idx
            )));
        }
        if config.lines[..idx]
            .iter()
            .any(|other| other.name.eq_ignore_ascii_case(&line.name))
        {
            return Err(ReworkError::Config(format!(
                "duplicate line name '{}'",
                line.name
            )));
        }
        validate_line(line)?;
    }

    Ok(())
}

fn validate_line(line: &LineConfig) -> Result<()> {
    let name = &line.name;

    // Connection descriptor must be complete
    let conn = &line.connection;
    if conn.host.trim().is_empty() {
        return Err(config_err(name, "connection.host is required"));
    }
    if conn.port == 0 {
        return Err(config_err(name, "connection.port must be non-zero"));
    }
    if conn.username.trim().is_empty() {
        return Err(config_err(name, "connection.username is required"));
    }
    if conn.password.trim().is_empty() {
        return Err(config_err(name, "connection.password is required"));
    }
    if conn.database.trim().is_empty() {
        return Err(config_err(name, "connection.database is required"));
    }

    validate_table(name, "source_table", &line.source_table)?;
    validate_table(name, "destination_table", &line.destination_table)?;

    if line.auxiliary_tables.is_empty() {
        return Err(config_err(name, "auxiliary_tables must not be empty"));
    }
    for spec in &line.auxiliary_tables {
        validate_table(name, "auxiliary_tables", spec)?;
    }

    if line.status_codes.is_empty() {
        return Err(config_err(name, "status_codes must not be empty"));
    }
    for status in &line.status_codes {
        if status.label.trim().is_empty() {
            return Err(config_err(
                name,
                &format!("status code {} has no label", status.key),
            ));
        }
    }
    for (idx, status) in line.status_codes.iter().enumerate() {
        if line.status_codes[..idx].iter().any(|s| s.key == status.key) {
            return Err(config_err(
                name,
                &format!("duplicate status code key {}", status.key),
            ));
        }
    }

    if line.excluded_columns.is_empty() {
        return Err(config_err(name, "excluded_columns must not be empty"));
    }
    if line.excluded_columns.iter().any(|c| c.trim().is_empty()) {
        return Err(config_err(
            name,
            "excluded_columns entries must not be blank",
        ));
    }

    Ok(())
}

fn validate_table(line: &str, field: &str, spec: &TableSpec) -> Result<()> {
    if spec.table.trim().is_empty() {
        return Err(config_err(line, &format!("{}.table is required", field)));
    }
    if spec
        .key_columns
        .first()
        .is_none_or(|c| c.trim().is_empty())
    {
        return Err(config_err(
            line,
            &format!("{}.key_columns needs a primary key column", field),
        ));
    }
    Ok(())
}

fn config_err(line: &str, message: &str) -> ReworkError {
    ReworkError::Config(format!("line '{}': {}", line, message))
}
