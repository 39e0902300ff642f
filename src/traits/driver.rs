use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BoundParameter, ResultSet};

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Preparing statements and binding parameters by their type tag
/// - Executing statements and materializing results
/// - Releasing backend statement resources on every exit path
///
/// SQL arrives with `?` placeholders, one per parameter, in binding order.
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Execute a statement that returns rows.
    async fn query(&self, sql: &str, params: &[BoundParameter]) -> Result<ResultSet>;

    /// Execute a statement and return the affected-row count.
    async fn execute(&self, sql: &str, params: &[BoundParameter]) -> Result<u64>;
}
