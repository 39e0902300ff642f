use crate::clauses::{validate_order_by, validate_table_list, MatchMode, Operand, WhereClause};
use crate::error::Result;
use crate::params;
use crate::types::{FieldMap, SqlValue};

use super::{Statement, StatementKind};

/// `SELECT * FROM <table>` with an optional filter, ordering and limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    table: String,
    filter: FieldMap,
    order_by: Option<String>,
    limit: Option<u64>,
    mode: MatchMode,
    operand: Operand,
}

impl Select {
    /// `table` may be a single table or a comma separated list.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Replace the filter map. An empty map selects the whole table.
    pub fn filter(mut self, filter: FieldMap) -> Self {
        self.filter = filter;
        self
    }

    /// Add one filter condition.
    pub fn where_(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filter.insert(column, value);
        self
    }

    /// ORDER BY list; an empty string means no ordering.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        let order_by = order_by.into();
        self.order_by = (!order_by.trim().is_empty()).then_some(order_by);
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Substring matching for every filter condition.
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

    /// Build the SQL query string and parameters.
    pub fn build(&self) -> Result<Statement> {
        validate_table_list(&self.table)?;
        let where_clause = WhereClause::new(&self.filter, self.mode, self.operand);
        where_clause.validate()?;
        if let Some(ref order_by) = self.order_by {
            validate_order_by(order_by)?;
        }

        let mut sql = String::with_capacity(128);
        sql.push_str("SELECT * FROM ");
        sql.push_str(&self.table);

        where_clause.append_to(&mut sql);

        if let Some(ref order_by) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_string());
        }

        Statement::new(sql, params::bind(&self.filter, None), StatementKind::Read)
    }
}
