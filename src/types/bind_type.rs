use super::SqlValue;

/// Type tag a value is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindType {
    Integer,
    Float,
    Text,
}

impl BindType {
    /// Classifies a value for binding.
    ///
    /// Integers and floats keep their numeric tag; text, null and anything else
    /// binds as text.
    pub fn infer(value: &SqlValue) -> Self {
        match value {
            SqlValue::Integer(_) => BindType::Integer,
            SqlValue::Float(_) => BindType::Float,
            SqlValue::Text(_) | SqlValue::Null => BindType::Text,
        }
    }

    /// One-letter tag: `i`, `d` or `s`.
    pub fn code(self) -> char {
        match self {
            BindType::Integer => 'i',
            BindType::Float => 'd',
            BindType::Text => 's',
        }
    }
}

/// A value paired with the type tag it was inferred to bind as.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    value: SqlValue,
    bind_type: BindType,
}

impl BoundParameter {
    /// Infers the tag once; it is never recomputed afterwards.
    pub fn new(value: SqlValue) -> Self {
        let bind_type = BindType::infer(&value);
        Self { value, bind_type }
    }

    pub fn value(&self) -> &SqlValue {
        &self.value
    }

    pub fn bind_type(&self) -> BindType {
        self.bind_type
    }

    pub fn into_value(self) -> SqlValue {
        self.value
    }
}

/// Renders the tag sequence of `params` as a string such as `"ssi"`.
pub fn bind_string(params: &[BoundParameter]) -> String {
    params.iter().map(|p| p.bind_type.code()).collect()
}
