//! dbengine - typed parameter binding for dynamically built CRUD statements
//!
//! Statements are rendered from ordered field maps with `?` placeholders; the values of
//! the same maps are bound in the same order, each tagged as integer, float or text.
//! Every call returns an [`ExecutionOutcome`] instead of an error.
//!
//! # Example
//! ```ignore
//! use dbengine::{ConnectionSession, FieldMap, Select, SessionConfig};
//!
//! let session = ConnectionSession::connect(SessionConfig::from_env()?).await;
//!
//! let outcome = session
//!     .select(Select::new("users").filter(
//!         FieldMap::new().with("username", "test").with("password", "pass"),
//!     ))
//!     .await;
//!
//! if let Some(rows) = outcome.result() {
//!     for row in rows.iter() {
//!         println!("{}", row.get("username")?);
//!     }
//! } else {
//!     eprintln!("{:?}", outcome.last_error());
//! }
//! ```

pub mod builders;
pub mod clauses;
pub mod config;
pub mod drivers;
pub mod error;
pub mod executor;
pub mod intent;
pub mod materialize;
pub mod params;
pub mod placeholder;
pub mod sink;
pub mod traits;
pub mod types;

mod session;

// Re-export main types for convenient access
pub use builders::{Custom, Delete, Insert, Select, Statement, StatementKind, Update};
pub use clauses::{MatchMode, Operand};
pub use config::SessionConfig;
pub use error::{DbEngineError, Result};
pub use executor::BindExecutor;
pub use intent::QueryIntent;
pub use session::ConnectionSession;
pub use sink::{ErrorSink, MemorySink, TracingSink};
pub use traits::DatabaseDriver;
pub use types::{
    BindType, BoundParameter, ExecutionOutcome, FieldMap, RawQueryResult, ResultRow, ResultSet,
    SqlValue,
};
