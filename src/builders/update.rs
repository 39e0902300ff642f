use crate::clauses::{validate_ident, MatchMode, Operand, WhereClause};
use crate::error::{DbEngineError, Result};
use crate::params;
use crate::types::{FieldMap, SqlValue};

use super::{Statement, StatementKind};

/// `UPDATE <table> SET <col>=?, ...` followed by the filter's WHERE clause.
///
/// An empty filter emits no WHERE clause and updates every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    table: String,
    values: FieldMap,
    filter: FieldMap,
    mode: MatchMode,
    operand: Operand,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    pub fn values(mut self, values: FieldMap) -> Self {
        self.values = values;
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.insert(column, value);
        self
    }

    pub fn filter(mut self, filter: FieldMap) -> Self {
        self.filter = filter;
        self
    }

    pub fn where_(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter.insert(column, value);
        self
    }

    pub fn like(mut self, like: bool) -> Self {
        self.mode = MatchMode::from_like(like);
        self
    }

    pub fn match_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn operand(mut self, operand: Operand) -> Self {
        self.operand = operand;
        self
    }

    pub fn build(&self) -> Result<Statement> {
        validate_ident("table", &self.table)?;
        if self.values.is_empty() {
            return Err(DbEngineError::Prepare(
                "update requires at least one column to set".to_string(),
            ));
        }
        let where_clause = WhereClause::new(&self.filter, self.mode, self.operand);
        where_clause.validate()?;

        let mut sql = String::with_capacity(128);
        sql.push_str("UPDATE ");
        sql.push_str(&self.table);
        sql.push_str(" SET ");
        for (i, column) in self.values.keys().enumerate() {
            validate_ident("column", column)?;
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str("=?");
        }

        where_clause.append_to(&mut sql);

        // SET placeholders come first, so the value map is the primary source.
        let params = params::bind(&self.values, Some(&self.filter));
        Statement::new(sql, params, StatementKind::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BindType;

    #[test]
    fn test_build_update() {
        let stmt = Update::new("users")
            .set("password", "kolo3")
            .where_("username", "kolo3")
            .build()
            .unwrap();

        assert_eq!(stmt.sql(), "UPDATE users SET password=? WHERE username = ?");
        assert_eq!(
            stmt.values(),
            vec![&SqlValue::from("kolo3"), &SqlValue::from("kolo3")]
        );
    }

    #[test]
    fn test_values_precede_filter() {
        let stmt = Update::new("accounts")
            .values(FieldMap::new().with("balance", 10.5).with("owner", "ann"))
            .filter(FieldMap::new().with("id", 3).with("region", "eu"))
            .operand(Operand::Or)
            .like(true)
            .build()
            .unwrap();

        assert_eq!(
            stmt.sql(),
            "UPDATE accounts SET balance=?, owner=? WHERE id LIKE CONCAT('%', ?, '%') \
             OR region LIKE CONCAT('%', ?, '%')"
        );
        assert_eq!(
            stmt.values(),
            vec![
                &SqlValue::Float(10.5),
                &SqlValue::from("ann"),
                &SqlValue::Integer(3),
                &SqlValue::from("eu"),
            ]
        );
        assert_eq!(
            stmt.bind_types(),
            vec![
                BindType::Float,
                BindType::Text,
                BindType::Integer,
                BindType::Text
            ]
        );
    }

    #[test]
    fn test_placeholder_count_is_values_plus_filter() {
        for (n_values, n_filter) in [(1, 0), (1, 1), (3, 2), (2, 5)] {
            let values: FieldMap = (0..n_values)
                .map(|i| (format!("v{i}"), i as i64))
                .collect();
            let filter: FieldMap = (0..n_filter)
                .map(|i| (format!("f{i}"), i as i64 * 100))
                .collect();
            let stmt = Update::new("t")
                .values(values.clone())
                .filter(filter.clone())
                .build()
                .unwrap();

            assert_eq!(stmt.sql().matches('?').count(), n_values + n_filter);
            let expected: Vec<&SqlValue> = values.values().chain(filter.values()).collect();
            assert_eq!(stmt.values(), expected);
        }
    }

    #[test]
    fn test_empty_filter_updates_all_rows() {
        let stmt = Update::new("users").set("active", 0).build().unwrap();
        assert_eq!(stmt.sql(), "UPDATE users SET active=?");
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(matches!(
            Update::new("users").where_("id", 1).build(),
            Err(DbEngineError::Prepare(_))
        ));
    }
}
