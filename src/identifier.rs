//! Database Name Validation
//!
//! `CREATE DATABASE` cannot take a bind parameter, so the name has to be
//! spliced into the statement text. Names are therefore checked against an
//! allow-list first and then emitted as a quoted identifier.
//!
//! # Validation Strategy
//! - Conservative allow-list: ASCII letters, digits and underscore
//! - Must not start with a digit
//! - At most 63 bytes (PostgreSQL truncates longer identifiers silently)
//! - Everything else is rejected with a helpful error message

use crate::error::{DbCliError, Result};

/// Longest identifier PostgreSQL keeps without truncation (`NAMEDATALEN - 1`)
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Validate a database name against the allow-list
///
/// Returns the name unchanged when it is acceptable.
pub fn validate_database_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(DbCliError::validation("Database name is required"));
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(DbCliError::validation(format!(
            "Database name must be at most {MAX_IDENTIFIER_LEN} characters, got {}",
            name.len()
        )));
    }

    let mut chars = name.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !(first_ok && rest_ok) {
        return Err(DbCliError::validation(format!(
            "Invalid database name '{name}': use letters, digits and underscores only, \
             and do not start with a digit"
        )));
    }

    Ok(name)
}

/// Quote an identifier for inclusion in SQL text
///
/// Embedded double quotes are doubled, so the result is always a single
/// identifier token even for input that slipped past validation.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_names() {
        assert_eq!(validate_database_name("app").unwrap(), "app");
        assert_eq!(validate_database_name("app_test_2").unwrap(), "app_test_2");
        assert_eq!(validate_database_name("_scratch").unwrap(), "_scratch");
        assert_eq!(validate_database_name("MixedCase").unwrap(), "MixedCase");
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = validate_database_name("").unwrap_err();
        assert!(matches!(err, DbCliError::ValidationError(_)));
        assert!(err.message().contains("required"));
    }

    #[test]
    fn test_rejects_injection_attempt() {
        let err = validate_database_name("x; DROP TABLE y").unwrap_err();
        assert!(matches!(err, DbCliError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_leading_digit_and_punctuation() {
        assert!(validate_database_name("1app").is_err());
        assert!(validate_database_name("my-app").is_err());
        assert!(validate_database_name("my app").is_err());
        assert!(validate_database_name("app\"").is_err());
        assert!(validate_database_name("données").is_err());
    }

    #[test]
    fn test_length_limit() {
        let longest = "a".repeat(MAX_IDENTIFIER_LEN);
        assert!(validate_database_name(&longest).is_ok());

        let too_long = "a".repeat(MAX_IDENTIFIER_LEN + 1);
        let err = validate_database_name(&too_long).unwrap_err();
        assert!(err.message().contains("at most 63"));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("app"), "\"app\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }
}
