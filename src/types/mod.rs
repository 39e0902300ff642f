mod bind_type;
mod field_map;
mod outcome;
mod row;
mod sql_value;

pub use bind_type::{bind_string, BindType, BoundParameter};
pub use field_map::FieldMap;
pub use outcome::ExecutionOutcome;
pub use row::{RawQueryResult, ResultRow, ResultSet};
pub use sql_value::SqlValue;
