//! Builds a [`ResultSet`] from a result whose columns are only known at runtime.
//!
//! A [`RowSource`] describes its columns first, then fills a caller-owned slot buffer one
//! tuple at a time. The buffer is reused between fetches, so every row is copied out into
//! its own [`ResultRow`] before the next fetch.

use crate::error::Result;
use crate::types::{RawQueryResult, ResultRow, ResultSet, SqlValue};

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Backend type name, for diagnostics.
    pub type_name: String,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A fetched result that can be walked once, tuple by tuple.
pub trait RowSource {
    /// Column descriptions, in result order.
    fn columns(&self) -> Vec<ColumnMeta>;

    /// Writes the next tuple into `slots` (one per column).
    /// Returns `false` once the result is exhausted.
    fn fetch(&mut self, slots: &mut [SqlValue]) -> Result<bool>;
}

/// Drains `source` into an owned [`ResultSet`].
pub fn materialize<S: RowSource + ?Sized>(source: &mut S) -> Result<ResultSet> {
    let columns: Vec<String> = source.columns().into_iter().map(|c| c.name).collect();
    let mut slots = vec![SqlValue::Null; columns.len()];
    let mut rows = Vec::new();

    while source.fetch(&mut slots)? {
        rows.push(ResultRow::new(&columns, slots.to_vec()));
    }

    Ok(ResultSet::new(columns, rows))
}

/// [`RowSource`] over an in-memory [`RawQueryResult`].
pub struct RawRowSource {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<SqlValue>>,
}

impl RawRowSource {
    pub fn new(raw: RawQueryResult) -> Self {
        Self {
            columns: raw.columns,
            rows: raw.rows.into_iter(),
        }
    }
}

impl RowSource for RawRowSource {
    fn columns(&self) -> Vec<ColumnMeta> {
        self.columns
            .iter()
            .map(|name| ColumnMeta::new(name.as_str(), "unknown"))
            .collect()
    }

    fn fetch(&mut self, slots: &mut [SqlValue]) -> Result<bool> {
        let Some(row) = self.rows.next() else {
            return Ok(false);
        };
        // Short rows leave trailing columns NULL; extra values are dropped.
        let mut values = row.into_iter();
        for slot in slots.iter_mut() {
            *slot = values.next().unwrap_or(SqlValue::Null);
        }
        Ok(true)
    }
}
