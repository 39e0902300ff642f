use std::sync::Arc;
use std::time::Duration;

use crate::builders::{Custom, Delete, Insert, Select, Update};
use crate::config::SessionConfig;
use crate::drivers::TokioPostgresDriver;
use crate::executor::BindExecutor;
use crate::intent::QueryIntent;
use crate::sink::{ErrorSink, TracingSink};
use crate::traits::DatabaseDriver;
use crate::types::ExecutionOutcome;

/// Main entry point for dbengine.
/// Holds one database connection and runs query intents against it, one at a time.
pub struct ConnectionSession {
    driver: Option<Arc<dyn DatabaseDriver>>,
    sink: Arc<dyn ErrorSink>,
    suppress_errors: bool,
    query_timeout: Option<Duration>,
    last_backend_error: Option<String>,
}

impl ConnectionSession {
    /// Connect to PostgreSQL with the given settings.
    ///
    /// Never fails: if the connection cannot be made the session is returned
    /// unestablished and [`last_backend_error`](Self::last_backend_error) says why.
    ///
    /// # Example
    /// ```ignore
    /// let config = SessionConfig::new("root", "password", "database");
    /// let session = ConnectionSession::connect(config).await;
    /// let outcome = session
    ///     .select(Select::new("users").where_("username", "test"))
    ///     .await;
    /// ```
    pub async fn connect(config: SessionConfig) -> Self {
        let session = match TokioPostgresDriver::connect(&config).await {
            Ok(driver) => Self::with_driver(Arc::new(driver)),
            Err(e) => {
                tracing::warn!(
                    target: "dbengine::connection",
                    host = %config.host,
                    database = %config.database,
                    error = %e,
                    "connection not established"
                );
                Self::offline(e.to_string())
            }
        };
        session.apply(&config)
    }

    /// Create a session over a custom driver.
    /// Useful for testing or using alternative database drivers.
    pub fn with_driver(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self {
            driver: Some(driver),
            sink: Arc::new(TracingSink),
            suppress_errors: false,
            query_timeout: None,
            last_backend_error: None,
        }
    }

    /// A session without a connection; every operation reports `NotConnected`.
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            driver: None,
            sink: Arc::new(TracingSink),
            suppress_errors: false,
            query_timeout: None,
            last_backend_error: Some(reason.into()),
        }
    }

    fn apply(mut self, config: &SessionConfig) -> Self {
        self.suppress_errors = config.suppress_errors;
        self.query_timeout = config.query_timeout;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn is_established(&self) -> bool {
        self.driver.is_some()
    }

    /// Why the connection could not be established, if it could not.
    pub fn last_backend_error(&self) -> Option<&str> {
        self.last_backend_error.as_deref()
    }

    /// Drop the connection. Later calls short-circuit to `NotConnected`.
    pub fn close(&mut self) {
        if self.driver.take().is_some() {
            tracing::debug!(target: "dbengine::connection", "session closed");
        }
    }

    /// Build and execute any intent.
    pub async fn run(&self, intent: impl Into<QueryIntent>) -> ExecutionOutcome {
        let Some(driver) = self.driver.as_deref() else {
            return ExecutionOutcome::not_connected();
        };

        let executor = BindExecutor::new(driver, self.sink.as_ref())
            .suppress_errors(self.suppress_errors)
            .timeout(self.query_timeout);

        let intent = intent.into();
        match intent.build() {
            Ok(statement) => executor.execute(&statement).await,
            Err(e) => {
                tracing::debug!(
                    target: "dbengine::sql",
                    intent = intent.name(),
                    error = %e,
                    "statement rejected"
                );
                executor.fail(e)
            }
        }
    }

    pub async fn select(&self, select: Select) -> ExecutionOutcome {
        self.run(select).await
    }

    pub async fn insert(&self, insert: Insert) -> ExecutionOutcome {
        self.run(insert).await
    }

    pub async fn update(&self, update: Update) -> ExecutionOutcome {
        self.run(update).await
    }

    pub async fn delete(&self, delete: Delete) -> ExecutionOutcome {
        self.run(delete).await
    }

    pub async fn custom(&self, custom: Custom) -> ExecutionOutcome {
        self.run(custom).await
    }
}
