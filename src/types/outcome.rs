use crate::error::DbEngineError;

use super::ResultSet;

/// Result of a single statement.
///
/// `count` is the affected-row count for writes, the row count for reads, and `-1` when
/// the call failed. Errors are captured here instead of being returned as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    count: i64,
    rows: Option<ResultSet>,
    error: Option<DbEngineError>,
    established: bool,
}

impl ExecutionOutcome {
    pub(crate) fn affected(count: u64) -> Self {
        Self {
            count: i64::try_from(count).unwrap_or(i64::MAX),
            rows: None,
            error: None,
            established: true,
        }
    }

    pub(crate) fn read(rows: ResultSet) -> Self {
        Self {
            count: i64::try_from(rows.len()).unwrap_or(i64::MAX),
            rows: Some(rows),
            error: None,
            established: true,
        }
    }

    pub(crate) fn failed(error: DbEngineError) -> Self {
        Self {
            count: -1,
            rows: None,
            error: Some(error),
            established: true,
        }
    }

    pub(crate) fn not_connected() -> Self {
        Self {
            count: -1,
            rows: None,
            error: Some(DbEngineError::NotConnected),
            established: false,
        }
    }

    /// Affected rows (writes), returned rows (reads), or `-1` on failure.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Rows of a successful read.
    pub fn result(&self) -> Option<&ResultSet> {
        self.rows.as_ref()
    }

    pub fn into_result(self) -> Option<ResultSet> {
        self.rows
    }

    pub fn error(&self) -> Option<&DbEngineError> {
        self.error.as_ref()
    }

    /// Text of the captured error, if any.
    pub fn last_error(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the session had a live connection when the call was made.
    pub fn is_established(&self) -> bool {
        self.established
    }
}
