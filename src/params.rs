//! Merges field maps into the positional parameter sequence of a statement.
//!
//! Primary-map values always precede filter-map values, each in the map's insertion
//! order. Builders render placeholders by walking the same maps in the same order, so
//! index `i` of every sequence returned here lines up with placeholder `i`.

use crate::types::{BindType, BoundParameter, FieldMap, SqlValue};

fn ordered<'a>(
    primary: &'a FieldMap,
    filter: Option<&'a FieldMap>,
) -> impl Iterator<Item = &'a SqlValue> {
    primary.values().chain(filter.into_iter().flat_map(FieldMap::values))
}

/// Values in binding order.
pub fn collect(primary: &FieldMap, filter: Option<&FieldMap>) -> Vec<SqlValue> {
    ordered(primary, filter).cloned().collect()
}

/// Type tags parallel to [`collect`].
pub fn collect_types(primary: &FieldMap, filter: Option<&FieldMap>) -> Vec<BindType> {
    ordered(primary, filter).map(BindType::infer).collect()
}

/// Values paired with their tags, in binding order.
pub fn bind(primary: &FieldMap, filter: Option<&FieldMap>) -> Vec<BoundParameter> {
    ordered(primary, filter)
        .cloned()
        .map(BoundParameter::new)
        .collect()
}

/// Binds a plain list of values, as supplied to custom statements.
pub fn bind_values(values: impl IntoIterator<Item = SqlValue>) -> Vec<BoundParameter> {
    values.into_iter().map(BoundParameter::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_map_keeps_order() {
        let map = FieldMap::new().with("username", "test").with("password", "pass");
        assert_eq!(
            collect(&map, None),
            vec![SqlValue::from("test"), SqlValue::from("pass")]
        );
        assert_eq!(collect_types(&map, None), vec![BindType::Text, BindType::Text]);
    }

    #[test]
    fn test_primary_precedes_filter() {
        let values = FieldMap::new().with("password", "kolo3").with("age", 30);
        let filter = FieldMap::new().with("username", "kolo3").with("score", 1.5);

        assert_eq!(
            collect(&values, Some(&filter)),
            vec![
                SqlValue::from("kolo3"),
                SqlValue::from(30),
                SqlValue::from("kolo3"),
                SqlValue::from(1.5),
            ]
        );
        assert_eq!(
            collect_types(&values, Some(&filter)),
            vec![
                BindType::Text,
                BindType::Integer,
                BindType::Text,
                BindType::Float
            ]
        );
    }

    #[test]
    fn test_bind_aligns_values_and_types() {
        let values = FieldMap::new().with("a", 1).with("b", SqlValue::Null);
        let filter = FieldMap::new().with("c", 2.0);

        let bound = bind(&values, Some(&filter));
        let collected = collect(&values, Some(&filter));
        let types = collect_types(&values, Some(&filter));

        assert_eq!(bound.len(), 3);
        for (i, param) in bound.iter().enumerate() {
            assert_eq!(param.value(), &collected[i]);
            assert_eq!(param.bind_type(), types[i]);
        }
    }

    #[test]
    fn test_empty_filter_contributes_nothing() {
        let values = FieldMap::new().with("a", 1);
        assert_eq!(bind(&values, Some(&FieldMap::new())).len(), 1);
    }
}
