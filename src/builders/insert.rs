use crate::clauses::validate_ident;
use crate::error::{DbEngineError, Result};
use crate::params;
use crate::types::{FieldMap, SqlValue};

use super::{Statement, StatementKind};

/// `INSERT INTO <table> (<cols>) VALUES (<placeholders>)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    table: String,
    values: FieldMap,
}

impl Insert {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: FieldMap::new(),
        }
    }

    pub fn values(mut self, values: FieldMap) -> Self {
        self.values = values;
        self
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.insert(column, value);
        self
    }

    pub fn build(&self) -> Result<Statement> {
        validate_ident("table", &self.table)?;
        if self.values.is_empty() {
            return Err(DbEngineError::Prepare(
                "insert requires at least one column".to_string(),
            ));
        }

        let mut columns = String::new();
        let mut placeholders = String::new();
        for (i, column) in self.values.keys().enumerate() {
            validate_ident("column", column)?;
            if i > 0 {
                columns.push(',');
                placeholders.push(',');
            }
            columns.push_str(column);
            placeholders.push('?');
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table, columns, placeholders
        );
        Statement::new(sql, params::bind(&self.values, None), StatementKind::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BindType;

    #[test]
    fn test_build_insert() {
        let stmt = Insert::new("users")
            .values(
                FieldMap::new()
                    .with("username", "kolo3")
                    .with("password", "lol")
                    .with("code", "lol"),
            )
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "INSERT INTO users (username,password,code) VALUES (?,?,?)"
        );
        assert_eq!(
            stmt.values(),
            vec![
                &SqlValue::from("kolo3"),
                &SqlValue::from("lol"),
                &SqlValue::from("lol")
            ]
        );
        assert_eq!(stmt.bind_types(), vec![BindType::Text; 3]);
        assert!(!stmt.is_read());
    }

    #[test]
    fn test_mixed_types() {
        let stmt = Insert::new("items")
            .value("name", "bolt")
            .value("qty", 12)
            .value("price", 0.25)
            .value("note", None::<String>)
            .build()
            .unwrap();
        assert_eq!(stmt.bind_string(), "sids");
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(matches!(
            Insert::new("users").build(),
            Err(DbEngineError::Prepare(_))
        ));
    }

    #[test]
    fn test_bad_table_rejected() {
        assert!(matches!(
            Insert::new("users, roles").value("a", 1).build(),
            Err(DbEngineError::Prepare(_))
        ));
    }
}
