use std::fmt;
use std::str::FromStr;

use crate::error::{DbEngineError, Result};
use crate::types::FieldMap;

use super::ident::validate_ident;

/// Logical operator joining consecutive filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operand {
    #[default]
    And,
    Or,
}

impl Operand {
    pub fn as_sql(self) -> &'static str {
        match self {
            Operand::And => "AND",
            Operand::Or => "OR",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operand {
    type Err = DbEngineError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("and") {
            Ok(Operand::And)
        } else if s.eq_ignore_ascii_case("or") {
            Ok(Operand::Or)
        } else {
            Err(DbEngineError::Prepare(format!("unknown operand '{s}'")))
        }
    }
}

/// How each filter condition compares its column to the bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// `<col> = ?`
    #[default]
    Exact,
    /// `<col> LIKE CONCAT('%', ?, '%')`
    Contains,
}

impl MatchMode {
    /// `true` selects substring matching.
    pub fn from_like(like: bool) -> Self {
        if like {
            MatchMode::Contains
        } else {
            MatchMode::Exact
        }
    }
}

/// WHERE clause driven by a filter map.
///
/// Renders one condition per key, in map order, each holding exactly one placeholder.
/// The bound values come from the same map via [`crate::params`], so placeholder `i`
/// always corresponds to the map's `i`-th value.
#[derive(Debug, Clone, Copy)]
pub struct WhereClause<'a> {
    filter: &'a FieldMap,
    mode: MatchMode,
    operand: Operand,
}

impl<'a> WhereClause<'a> {
    pub fn new(filter: &'a FieldMap, mode: MatchMode, operand: Operand) -> Self {
        Self {
            filter,
            mode,
            operand,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    pub fn filter(&self) -> &'a FieldMap {
        self.filter
    }

    /// Checks every column name before anything is rendered.
    pub fn validate(&self) -> Result<()> {
        for column in self.filter.keys() {
            validate_ident("column", column)?;
        }
        Ok(())
    }

    /// Appends ` WHERE ...` to `sql`, or nothing when the filter is empty.
    pub fn append_to(&self, sql: &mut String) {
        for (i, column) in self.filter.keys().enumerate() {
            if i == 0 {
                sql.push_str(" WHERE ");
            } else {
                sql.push(' ');
                sql.push_str(self.operand.as_sql());
                sql.push(' ');
            }
            sql.push_str(column);
            match self.mode {
                MatchMode::Exact => sql.push_str(" = ?"),
                MatchMode::Contains => sql.push_str(" LIKE CONCAT('%', ?, '%')"),
            }
        }
    }
}
