use std::future::Future;
use std::time::Duration;

use crate::builders::Statement;
use crate::error::{DbEngineError, Result};
use crate::sink::ErrorSink;
use crate::traits::DatabaseDriver;
use crate::types::ExecutionOutcome;

/// Runs a built [`Statement`] against a driver and folds the result into an
/// [`ExecutionOutcome`].
///
/// Failures never escape as `Err`: the outcome carries a count of `-1` and the error.
/// Unless suppression is on, the error text is also handed to the [`ErrorSink`].
pub struct BindExecutor<'a> {
    driver: &'a dyn DatabaseDriver,
    sink: &'a dyn ErrorSink,
    suppress_errors: bool,
    timeout: Option<Duration>,
}

impl<'a> BindExecutor<'a> {
    pub fn new(driver: &'a dyn DatabaseDriver, sink: &'a dyn ErrorSink) -> Self {
        Self {
            driver,
            sink,
            suppress_errors: false,
            timeout: None,
        }
    }

    pub fn suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    /// Deadline applied to each driver call.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads return their materialized rows and row count; writes return the
    /// backend's affected-row count.
    pub async fn execute(&self, statement: &Statement) -> ExecutionOutcome {
        tracing::debug!(
            target: "dbengine::sql",
            sql = statement.sql(),
            binds = %statement.bind_string(),
            kind = ?statement.kind(),
            "executing statement"
        );

        let params = statement.params();
        let outcome = if statement.is_read() {
            self.bounded(self.driver.query(statement.sql(), params))
                .await
                .map(ExecutionOutcome::read)
        } else {
            self.bounded(self.driver.execute(statement.sql(), params))
                .await
                .map(ExecutionOutcome::affected)
        };

        outcome.unwrap_or_else(|e| self.fail(e))
    }

    /// Captures (and unless suppressed, reports) an error raised before execution.
    pub fn fail(&self, error: DbEngineError) -> ExecutionOutcome {
        if !self.suppress_errors {
            self.sink.report(&error.to_string());
        }
        ExecutionOutcome::failed(error)
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| DbEngineError::Timeout(limit))?,
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{Insert, Select};
    use crate::drivers::{InMemoryTestDriver, InMemoryTestResponseBuilder};
    use crate::sink::MemorySink;
    use crate::types::SqlValue;

    #[tokio::test]
    async fn test_read_records_row_count() {
        let driver = InMemoryTestDriver::new().with_response(
            InMemoryTestResponseBuilder::new()
                .columns(&["id"])
                .row(vec![1.into()])
                .row(vec![2.into()])
                .build(),
        );
        let sink = MemorySink::new();
        let stmt = Select::new("users").build().unwrap();

        let outcome = BindExecutor::new(&driver, &sink).execute(&stmt).await;

        assert!(outcome.is_ok());
        assert_eq!(outcome.count(), 2);
        assert_eq!(outcome.result().unwrap().len(), 2);
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_write_records_affected_rows() {
        let driver = InMemoryTestDriver::new().with_affected_rows(1);
        let sink = MemorySink::new();
        let stmt = Insert::new("users").value("username", "x").build().unwrap();

        let outcome = BindExecutor::new(&driver, &sink).execute(&stmt).await;

        assert_eq!(outcome.count(), 1);
        assert!(outcome.result().is_none());
        driver.assert_last_query(
            "INSERT INTO users (username) VALUES (?)",
            &[SqlValue::from("x")],
        );
    }

    #[tokio::test]
    async fn test_error_is_captured_and_reported() {
        let driver = InMemoryTestDriver::new().with_error(DbEngineError::Execution(
            "duplicate key value violates unique constraint".to_string(),
        ));
        let sink = MemorySink::new();
        let stmt = Insert::new("users").value("username", "x").build().unwrap();

        let outcome = BindExecutor::new(&driver, &sink).execute(&stmt).await;

        assert_eq!(outcome.count(), -1);
        assert!(!outcome.is_ok());
        assert_eq!(
            sink.messages(),
            vec!["Execution failed: duplicate key value violates unique constraint".to_string()]
        );
    }

    #[tokio::test]
    async fn test_suppressed_error_is_only_captured() {
        let driver =
            InMemoryTestDriver::new().with_error(DbEngineError::Prepare("syntax".to_string()));
        let sink = MemorySink::new();
        let stmt = Select::new("users").build().unwrap();

        let outcome = BindExecutor::new(&driver, &sink)
            .suppress_errors(true)
            .execute(&stmt)
            .await;

        assert_eq!(outcome.count(), -1);
        assert_eq!(
            outcome.error(),
            Some(&DbEngineError::Prepare("syntax".to_string()))
        );
        assert!(sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_timeout() {
        let driver = InMemoryTestDriver::new().with_delay(Duration::from_millis(500));
        let sink = MemorySink::new();
        let stmt = Select::new("users").build().unwrap();

        let outcome = BindExecutor::new(&driver, &sink)
            .timeout(Some(Duration::from_millis(20)))
            .execute(&stmt)
            .await;

        assert_eq!(outcome.count(), -1);
        assert_eq!(
            outcome.error(),
            Some(&DbEngineError::Timeout(Duration::from_millis(20)))
        );
    }
}
