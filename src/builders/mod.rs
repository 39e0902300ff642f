mod custom;
mod delete;
mod insert;
mod select;
mod statement;
mod update;

pub use custom::Custom;
pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use statement::{Statement, StatementKind};
pub use update::Update;
