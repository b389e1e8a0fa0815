//! Error types for the rework library.

use thiserror::Error;

/// Main error type for archive operations.
#[derive(Error, Debug)]
pub enum ReworkError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Column metadata for the source table came back empty
    #[error("No column metadata for {database}.{table}")]
    SchemaNotFound { table: String, database: String },

    /// A column's declared type has no binding rule
    #[error("Unsupported column type: {type_name}")]
    UnsupportedColumnType { type_name: String },

    /// No row matched the supplied key(s) in the source table
    #[error("No record in {table} matched the given key(s)")]
    RecordNotFound { table: String },

    /// An insert into the destination affected zero rows
    #[error("Insert into {table} affected no rows")]
    WriteFailed { table: String },

    /// A delete affected zero rows where at least one was required
    #[error("Delete from {table} affected no rows")]
    DeleteFailed { table: String },

    /// Database connection, transaction or query error
    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReworkError {
    /// Create a SchemaNotFound error
    pub fn schema_not_found(table: impl Into<String>, database: impl Into<String>) -> Self {
        ReworkError::SchemaNotFound {
            table: table.into(),
            database: database.into(),
        }
    }

    /// Create an UnsupportedColumnType error
    pub fn unsupported_column_type(type_name: impl Into<String>) -> Self {
        ReworkError::UnsupportedColumnType {
            type_name: type_name.into(),
        }
    }

    /// Create a RecordNotFound error
    pub fn record_not_found(table: impl Into<String>) -> Self {
        ReworkError::RecordNotFound {
            table: table.into(),
        }
    }

    /// Create a WriteFailed error
    pub fn write_failed(table: impl Into<String>) -> Self {
        ReworkError::WriteFailed {
            table: table.into(),
        }
    }

    /// Create a DeleteFailed error
    pub fn delete_failed(table: impl Into<String>) -> Self {
        ReworkError::DeleteFailed {
            table: table.into(),
        }
    }

    /// True when the fault was caused by operator input (a key that matched
    /// nothing) rather than by configuration or system state. Presentation
    /// layers word these two classes differently.
    pub fn is_user_input(&self) -> bool {
        matches!(self, ReworkError::RecordNotFound { .. })
    }

    /// Process exit code for this error: 1 configuration, 2 operator input,
    /// 3 database or engine, 7 IO.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReworkError::Config(_) | ReworkError::Yaml(_) | ReworkError::Json(_) => 1,
            ReworkError::RecordNotFound { .. } => 2,
            ReworkError::SchemaNotFound { .. }
            | ReworkError::UnsupportedColumnType { .. }
            | ReworkError::WriteFailed { .. }
            | ReworkError::DeleteFailed { .. }
            | ReworkError::Database(_) => 3,
            ReworkError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ReworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_is_the_only_user_input_fault() {
        assert!(ReworkError::record_not_found("prad").is_user_input());
        assert!(!ReworkError::schema_not_found("prad", "linie_852").is_user_input());
        assert!(!ReworkError::unsupported_column_type("geometry").is_user_input());
        assert!(!ReworkError::write_failed("prad_rework").is_user_input());
        assert!(!ReworkError::delete_failed("prad").is_user_input());
        assert!(!ReworkError::Config("bad".into()).is_user_input());
    }

    #[test]
    fn display_names_the_offending_object() {
        let err = ReworkError::schema_not_found("prad", "linie_852");
        assert_eq!(err.to_string(), "No column metadata for linie_852.prad");

        let err = ReworkError::unsupported_column_type("geometry");
        assert_eq!(err.to_string(), "Unsupported column type: geometry");
    }

    #[test]
    fn exit_codes_group_by_fault_class() {
        assert_eq!(ReworkError::Config("bad".into()).exit_code(), 1);
        assert_eq!(ReworkError::record_not_found("prad").exit_code(), 2);
        assert_eq!(ReworkError::delete_failed("prad").exit_code(), 3);
        assert_eq!(ReworkError::write_failed("prad_rework").exit_code(), 3);
        assert_eq!(
            ReworkError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).exit_code(),
            7
        );
    }
}
