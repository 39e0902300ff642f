use crate::error::{DbEngineError, Result};

use super::{FieldMap, SqlValue};

/// Driver-agnostic raw result: column names plus rows of values in column order.
#[derive(Debug, Clone, Default)]
pub struct RawQueryResult {
    /// Column names in order
    pub columns: Vec<String>,
    /// Rows, where each row is a vector of values in column order
    pub rows: Vec<Vec<SqlValue>>,
}

impl RawQueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<SqlValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single materialized row, accessed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    values: FieldMap,
}

impl ResultRow {
    /// Creates a row from column names and a snapshot of their values.
    /// A repeated column name keeps its first position and takes the later value.
    pub(crate) fn new(columns: &[String], values: Vec<SqlValue>) -> Self {
        let values = columns.iter().cloned().zip(values).collect();
        Self { values }
    }

    /// Gets a value by column name.
    pub fn get(&self, column: &str) -> Result<&SqlValue> {
        self.values
            .get(column)
            .ok_or_else(|| DbEngineError::ColumnNotFound(column.to_string()))
    }

    /// Returns all column names in this row, in result order.
    pub fn columns(&self) -> Vec<&str> {
        self.values.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_field_map(self) -> FieldMap {
        self.values
    }
}

/// Rows returned by a read, in driver order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultSet {
    pub(crate) fn new(columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self { columns, rows }
    }

    /// Builds a ResultSet from a RawQueryResult.
    pub fn from_raw(raw: RawQueryResult) -> Self {
        let rows = raw
            .rows
            .into_iter()
            .map(|values| ResultRow::new(&raw.columns, values))
            .collect();
        Self {
            columns: raw.columns,
            rows,
        }
    }

    /// Extracts a single row from the result.
    /// Returns an error if the result contains zero or more than one row.
    pub fn single_row(self) -> Result<ResultRow> {
        let actual = self.rows.len();
        let mut rows = self.rows.into_iter();
        match (rows.next(), rows.next()) {
            (Some(row), None) => Ok(row),
            _ => Err(DbEngineError::UnexpectedRowCount {
                expected: 1,
                actual,
            }),
        }
    }

    /// Returns all rows from the result.
    pub fn rows(self) -> Vec<ResultRow> {
        self.rows
    }

    /// Returns a reference to the rows without consuming the result.
    pub fn rows_ref(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    /// Returns the column names reported by the result metadata.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultRow;
    type IntoIter = std::vec::IntoIter<ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
