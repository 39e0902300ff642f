use crate::builders::{Custom, Delete, Insert, Select, Statement, Update};
use crate::error::Result;

/// A high-level request, rendered into a [`Statement`] per call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryIntent {
    Select(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Custom(Custom),
}

impl QueryIntent {
    pub fn build(&self) -> Result<Statement> {
        match self {
            QueryIntent::Select(q) => q.build(),
            QueryIntent::Insert(q) => q.build(),
            QueryIntent::Update(q) => q.build(),
            QueryIntent::Delete(q) => q.build(),
            QueryIntent::Custom(q) => q.build(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryIntent::Select(_) => "select",
            QueryIntent::Insert(_) => "insert",
            QueryIntent::Update(_) => "update",
            QueryIntent::Delete(_) => "delete",
            QueryIntent::Custom(_) => "custom",
        }
    }
}

macro_rules! impl_from_builder {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for QueryIntent {
                fn from(builder: $variant) -> Self {
                    QueryIntent::$variant(builder)
                }
            }
        )*
    };
}

impl_from_builder!(Select, Insert, Update, Delete, Custom);
