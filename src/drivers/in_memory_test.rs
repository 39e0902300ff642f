use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{DbEngineError, Result};
use crate::materialize::{materialize, RawRowSource};
use crate::traits::DatabaseDriver;
use crate::types::{BindType, BoundParameter, RawQueryResult, ResultSet, SqlValue};

/// A recorded statement execution for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub types: Vec<BindType>,
}

#[derive(Debug, Clone)]
enum InMemoryResponse {
    Rows(RawQueryResult),
    Affected(u64),
    Error(DbEngineError),
}

/// An in-memory database driver for testing.
///
/// Replays queued responses in FIFO order and records every statement it receives.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use dbengine::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
///
/// let driver = Arc::new(
///     InMemoryTestDriver::new().with_response(
///         InMemoryTestResponseBuilder::new()
///             .columns(&["id", "name"])
///             .row(vec![1.into(), "Alice".into()])
///             .build(),
///     ),
/// );
/// ```
pub struct InMemoryTestDriver {
    responses: Mutex<VecDeque<InMemoryResponse>>,
    recorded_queries: Mutex<Vec<RecordedQuery>>,
    default_response: RawQueryResult,
    delay: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no pre-configured responses.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            recorded_queries: Mutex::new(Vec::new()),
            default_response: RawQueryResult::empty(),
            delay: None,
        }
    }

    /// Queue rows for the next statement.
    pub fn with_response(self, response: RawQueryResult) -> Self {
        lock(&self.responses).push_back(InMemoryResponse::Rows(response));
        self
    }

    /// Queue rows for several subsequent statements.
    pub fn with_responses(self, responses: impl IntoIterator<Item = RawQueryResult>) -> Self {
        lock(&self.responses).extend(responses.into_iter().map(InMemoryResponse::Rows));
        self
    }

    /// Queue an affected-row count for the next statement.
    pub fn with_affected_rows(self, count: u64) -> Self {
        lock(&self.responses).push_back(InMemoryResponse::Affected(count));
        self
    }

    /// Queue a failure for the next statement.
    pub fn with_error(self, error: DbEngineError) -> Self {
        lock(&self.responses).push_back(InMemoryResponse::Error(error));
        self
    }

    /// Set a default response to use when no queued responses remain.
    pub fn with_default_response(mut self, response: RawQueryResult) -> Self {
        self.default_response = response;
        self
    }

    /// Sleep before answering each statement.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get all recorded statements that have been executed.
    pub fn recorded_queries(&self) -> Vec<RecordedQuery> {
        lock(&self.recorded_queries).clone()
    }

    /// Get the last recorded statement, if any.
    pub fn last_query(&self) -> Option<RecordedQuery> {
        lock(&self.recorded_queries).last().cloned()
    }

    /// Clear all recorded statements.
    pub fn clear_recorded_queries(&self) {
        lock(&self.recorded_queries).clear();
    }

    /// Assert that the last statement matches the expected SQL and parameters.
    pub fn assert_last_query(&self, expected_sql: &str, expected_params: &[SqlValue]) {
        let last = self.last_query().expect("No queries were recorded");
        assert_eq!(
            last.sql, expected_sql,
            "SQL mismatch.\nExpected: {}\nActual: {}",
            expected_sql, last.sql
        );
        assert_eq!(
            last.params, expected_params,
            "Parameters mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_params, last.params
        );
    }

    /// Assert that exactly n statements were executed.
    pub fn assert_query_count(&self, expected: usize) {
        let actual = lock(&self.recorded_queries).len();
        assert_eq!(
            actual, expected,
            "Query count mismatch. Expected: {}, Actual: {}",
            expected, actual
        );
    }

    async fn respond(&self, sql: &str, params: &[BoundParameter]) -> InMemoryResponse {
        lock(&self.recorded_queries).push(RecordedQuery {
            sql: sql.to_string(),
            params: params.iter().map(|p| p.value().clone()).collect(),
            types: params.iter().map(BoundParameter::bind_type).collect(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| InMemoryResponse::Rows(self.default_response.clone()))
    }
}

impl Default for InMemoryTestDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn query(&self, sql: &str, params: &[BoundParameter]) -> Result<ResultSet> {
        match self.respond(sql, params).await {
            InMemoryResponse::Rows(raw) => materialize(&mut RawRowSource::new(raw)),
            InMemoryResponse::Affected(_) => Ok(ResultSet::default()),
            InMemoryResponse::Error(e) => Err(e),
        }
    }

    async fn execute(&self, sql: &str, params: &[BoundParameter]) -> Result<u64> {
        match self.respond(sql, params).await {
            InMemoryResponse::Rows(raw) => Ok(raw.rows.len() as u64),
            InMemoryResponse::Affected(count) => Ok(count),
            InMemoryResponse::Error(e) => Err(e),
        }
    }
}

/// Builder for creating test responses easily.
pub struct InMemoryTestResponseBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
}

impl InMemoryTestResponseBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Set the column names for the response.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Add a row of values in column order.
    pub fn row(mut self, values: Vec<SqlValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Build the RawQueryResult.
    pub fn build(self) -> RawQueryResult {
        RawQueryResult::new(self.columns, self.rows)
    }
}

impl Default for InMemoryTestResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
