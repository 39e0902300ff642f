use super::SqlValue;

/// Ordered mapping from column name to value.
///
/// Iteration follows insertion order, which is the order placeholders are rendered and
/// parameters are bound in. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap {
    entries: Vec<(String, SqlValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one if the column was already present.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        value: impl Into<SqlValue>,
    ) -> Option<SqlValue> {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((column, value));
                None
            }
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &SqlValue> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<SqlValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (column, value) in iter {
            map.insert(column, value);
        }
        map
    }
}

impl<K: Into<String>, V: Into<SqlValue>, const N: usize> From<[(K, V); N]> for FieldMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, SqlValue);
    type IntoIter = std::vec::IntoIter<(String, SqlValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
