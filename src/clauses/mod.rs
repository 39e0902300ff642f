mod ident;
mod where_clause;

pub use ident::{validate_ident, validate_order_by, validate_table_list};
pub use where_clause::{MatchMode, Operand, WhereClause};
