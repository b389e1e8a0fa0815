//! Identifier validation and quoting for SQL injection prevention.
//!
//! Table and column names cannot be passed as parameters in prepared
//! statements - only data values can be parameterized. Identifiers arrive
//! here from the configuration file and from INFORMATION_SCHEMA, and every
//! one that reaches SQL text is validated for suspicious patterns and then
//! backtick-quoted with escaping.

use crate::error::{ReworkError, Result};

/// Maximum identifier length (MySQL's own limit is 64 characters).
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `ReworkError::Config` for invalid identifiers with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ReworkError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(ReworkError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ReworkError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a MySQL identifier using backticks.
///
/// Escapes backticks by doubling them and wraps in backticks.
/// Validates the identifier before quoting.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(quote_ident("prad")?, "`prad`");
/// assert_eq!(quote_ident("table`name")?, "`table``name`");
/// ```
pub fn quote_ident(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("prad").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Seriennummer").is_ok());
        assert!(validate_identifier("column with spaces").is_ok());
        assert!(validate_identifier("日本語").is_ok()); // Unicode
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_validate_identifier_accepts_max_length() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }

    // =========================================================================
    // Quoting tests
    // =========================================================================

    #[test]
    fn test_quote_ident_normal() {
        assert_eq!(quote_ident("prad").unwrap(), "`prad`");
        assert_eq!(quote_ident("my_table").unwrap(), "`my_table`");
    }

    #[test]
    fn test_quote_ident_escapes_backtick() {
        assert_eq!(quote_ident("table`name").unwrap(), "`table``name`");
        assert_eq!(quote_ident("a`b`c").unwrap(), "`a``b``c`");
    }

    #[test]
    fn test_quote_ident_rejects_null_byte() {
        assert!(quote_ident("table\0name").is_err());
    }

    #[test]
    fn test_quote_ident_sql_injection_safely_quoted() {
        let result = quote_ident("Robert`); DROP TABLE Students;--");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "`Robert``); DROP TABLE Students;--`");
    }
}
