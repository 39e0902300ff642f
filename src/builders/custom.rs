use crate::error::Result;
use crate::params;
use crate::types::SqlValue;

use super::{Statement, StatementKind};

/// Caller-written SQL with `?` placeholders, passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Custom {
    sql: String,
    params: Vec<SqlValue>,
    kind: StatementKind,
}

impl Custom {
    /// A write statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind: StatementKind::Write,
        }
    }

    pub fn params<I, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn param(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Marks the statement as returning rows.
    pub fn read(mut self, read: bool) -> Self {
        self.kind = if read {
            StatementKind::Read
        } else {
            StatementKind::Write
        };
        self
    }

    /// Only the placeholder count is checked; the text itself is the caller's.
    pub fn build(&self) -> Result<Statement> {
        Statement::new(
            self.sql.clone(),
            params::bind_values(self.params.iter().cloned()),
            self.kind,
        )
    }
}
