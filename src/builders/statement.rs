use crate::error::{DbEngineError, Result};
use crate::placeholder::count_placeholders;
use crate::types::{bind_string, BindType, BoundParameter, SqlValue};

/// Whether a statement returns rows or an affected-row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

/// Rendered SQL together with the parameters bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<BoundParameter>,
    kind: StatementKind,
}

impl Statement {
    /// Fails with [`DbEngineError::BindArity`] unless `sql` holds exactly one `?` per
    /// parameter.
    pub fn new(sql: String, params: Vec<BoundParameter>, kind: StatementKind) -> Result<Self> {
        let placeholders = count_placeholders(&sql);
        if placeholders != params.len() {
            return Err(DbEngineError::BindArity {
                placeholders,
                parameters: params.len(),
            });
        }
        Ok(Self { sql, params, kind })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[BoundParameter] {
        &self.params
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn is_read(&self) -> bool {
        self.kind == StatementKind::Read
    }

    pub fn values(&self) -> Vec<&SqlValue> {
        self.params.iter().map(BoundParameter::value).collect()
    }

    pub fn bind_types(&self) -> Vec<BindType> {
        self.params.iter().map(BoundParameter::bind_type).collect()
    }

    /// Tag string such as `"ssi"`.
    pub fn bind_string(&self) -> String {
        bind_string(&self.params)
    }
}
