//! Identifier checks for names spliced into statement text.
//!
//! Table and column names cannot be bound as parameters, so they are validated before a
//! statement is rendered. Each dotted part must match `[A-Za-z_][A-Za-z0-9_$]*`.

use crate::error::{DbEngineError, Result};

fn is_valid_part(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Validates a possibly dotted identifier such as `users` or `public.users.id`.
pub fn validate_ident<'a>(kind: &str, ident: &'a str) -> Result<&'a str> {
    if !ident.is_empty() && ident.split('.').all(is_valid_part) {
        Ok(ident)
    } else {
        Err(DbEngineError::Prepare(format!("invalid {kind} identifier '{ident}'")))
    }
}

/// Validates a comma separated list of tables, e.g. `users, roles`.
pub fn validate_table_list(tables: &str) -> Result<&str> {
    for table in tables.split(',').map(str::trim) {
        validate_ident("table", table)?;
    }
    Ok(tables)
}

/// Validates an ORDER BY list: `<ident> [ASC|DESC]`, comma separated.
pub fn validate_order_by(order_by: &str) -> Result<&str> {
    for term in order_by.split(',') {
        let mut words = term.split_whitespace();
        let column = words.next().unwrap_or_default();
        validate_ident("order by", column)?;
        match words.next() {
            None => {}
            Some(dir) if dir.eq_ignore_ascii_case("asc") || dir.eq_ignore_ascii_case("desc") => {}
            Some(other) => {
                return Err(DbEngineError::Prepare(format!(
                    "invalid order by direction '{other}'"
                )))
            }
        }
        if words.next().is_some() {
            return Err(DbEngineError::Prepare(format!(
                "invalid order by term '{}'",
                term.trim()
            )));
        }
    }
    Ok(order_by)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_idents() {
        assert!(validate_ident("column", "username").is_ok());
        assert!(validate_ident("column", "_id").is_ok());
        assert!(validate_ident("column", "users.id").is_ok());
        assert!(validate_ident("column", "col$1").is_ok());
    }

    #[test]
    fn test_invalid_idents() {
        for bad in ["", "1abc", "users.", "a b", "id; DROP TABLE users", "name=?"] {
            assert!(
                matches!(validate_ident("column", bad), Err(DbEngineError::Prepare(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_table_list() {
        assert!(validate_table_list("users").is_ok());
        assert!(validate_table_list("users, roles").is_ok());
        assert!(validate_table_list("users,").is_err());
    }

    #[test]
    fn test_order_by() {
        assert!(validate_order_by("name").is_ok());
        assert!(validate_order_by("name DESC, id asc").is_ok());
        assert!(validate_order_by("name sideways").is_err());
        assert!(validate_order_by("name desc nulls").is_err());
        assert!(validate_order_by("").is_err());
    }
}
