use crate::clauses::{validate_ident, MatchMode, Operand, WhereClause};
use crate::error::Result;
use crate::params;
use crate::types::{FieldMap, SqlValue};

use super::{Statement, StatementKind};

/// `DELETE FROM <table>` with an optional filter. Without a filter every row is deleted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delete {
    table: String,
    filter: FieldMap,
    mode: MatchMode,
    operand: Operand,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
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
        let where_clause = WhereClause::new(&self.filter, self.mode, self.operand);
        where_clause.validate()?;

        let mut sql = format!("DELETE FROM {}", self.table);
        where_clause.append_to(&mut sql);

        Statement::new(sql, params::bind(&self.filter, None), StatementKind::Write)
    }
}
