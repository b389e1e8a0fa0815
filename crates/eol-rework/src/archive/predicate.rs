//! Key-predicate construction shared by record selection and deletion.

use mysql_async::Value;

use crate::config::TableSpec;
use crate::error::{ReworkError, Result};
use crate::identifier::quote_ident;

/// WHERE clause plus its positional parameters for locating one record in a
/// table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct KeyPredicate {
    pub clause: String,
    pub params: Vec<Value>,
}

/// Build the equality predicate for `table`: always `keys[0] = ?`, narrowed
/// with `AND keys[1] = ?` only when the table defines a second key column
/// with a non-blank name and a secondary value was supplied.
pub(crate) fn key_predicate(
    table: &TableSpec,
    primary: &str,
    secondary: Option<&str>,
) -> Result<KeyPredicate> {
    let pk = table
        .primary_key()
        .ok_or_else(|| ReworkError::Config(format!("table {} has no key column", table.table)))?;

    let mut clause = format!("{} = ?", quote_ident(pk)?);
    let mut params = vec![Value::from(primary)];

    if let (Some(sk), Some(value)) = (table.secondary_key(), secondary) {
        clause.push_str(&format!(" AND {} = ?", quote_ident(sk)?));
        params.push(Value::from(value));
    }

    Ok(KeyPredicate { clause, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(table: &str, keys: &[&str]) -> TableSpec {
        TableSpec {
            table: table.to_string(),
            key_columns: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_primary_key_only() {
        let p = key_predicate(&spec("abblasen", &["Seriennummer"]), "123", None).unwrap();
        assert_eq!(p.clause, "`Seriennummer` = ?");
        assert_eq!(p.params, vec![Value::from("123")]);
    }

    #[test]
    fn test_secondary_key_narrows_when_supplied() {
        let p = key_predicate(
            &spec("prad", &["Seriennummer", "Teilenummer"]),
            "123",
            Some("A-7"),
        )
        .unwrap();
        assert_eq!(p.clause, "`Seriennummer` = ? AND `Teilenummer` = ?");
        assert_eq!(p.params, vec![Value::from("123"), Value::from("A-7")]);
    }

    #[test]
    fn test_secondary_value_ignored_without_second_column() {
        let p = key_predicate(&spec("abblasen", &["Seriennummer"]), "123", Some("A-7")).unwrap();
        assert_eq!(p.clause, "`Seriennummer` = ?");
        assert_eq!(p.params.len(), 1);
    }

    #[test]
    fn test_second_column_ignored_without_value() {
        let p = key_predicate(&spec("prad", &["Seriennummer", "Teilenummer"]), "123", None).unwrap();
        assert_eq!(p.clause, "`Seriennummer` = ?");
        assert_eq!(p.params.len(), 1);
    }

    #[test]
    fn test_blank_second_column_name_ignored() {
        let p = key_predicate(&spec("prad", &["Seriennummer", " "]), "123", Some("A-7")).unwrap();
        assert_eq!(p.clause, "`Seriennummer` = ?");
        assert_eq!(p.params.len(), 1);
    }

    #[test]
    fn test_key_columns_are_quoted() {
        let p = key_predicate(&spec("t", &["weird`name"]), "x", None).unwrap();
        assert_eq!(p.clause, "`weird``name` = ?");
    }

    #[test]
    fn test_no_key_column_is_a_config_error() {
        let err = key_predicate(&spec("prad", &[]), "123", None).unwrap_err();
        assert!(matches!(err, ReworkError::Config(_)));
    }
}
