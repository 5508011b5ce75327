//! Field values used by predicates and sorting

use std::cmp::Ordering;

/// A polymorphic field value read from an entity or a filter parameter
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    String(String),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a decimal, widening integers
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Compare two non-null values of compatible kinds.
    ///
    /// Integers and decimals compare numerically with each other. Any
    /// comparison involving `Null` or mismatched kinds yields `None`, which
    /// every predicate operator treats as "no match", like SQL does.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_decimal(), b.as_decimal()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Total ordering used for sorting, with nulls after every value
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.compare(other).unwrap_or(Ordering::Equal),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_null_from_option() {
        let value: FieldValue = Option::<String>::None.into();
        assert!(value.is_null());
        assert_eq!(value.as_string(), None);

        let value: FieldValue = Some(5_i64).into();
        assert_eq!(value.as_integer(), Some(5));
    }

    #[test]
    fn test_numeric_comparison_crosses_kinds() {
        let int = FieldValue::Integer(2);
        let dec = FieldValue::Decimal(2.0);
        assert_eq!(int.compare(&dec), Some(Ordering::Equal));
        assert_eq!(
            FieldValue::Decimal(1.5).compare(&int),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_null_never_compares() {
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), None);
        assert_eq!(FieldValue::Null.compare(&FieldValue::Integer(1)), None);
        assert_eq!(
            FieldValue::String("a".into()).compare(&FieldValue::Integer(1)),
            None
        );
    }

    #[test]
    fn test_sort_puts_nulls_last() {
        let mut values = vec![
            FieldValue::Null,
            FieldValue::String("b".into()),
            FieldValue::String("a".into()),
        ];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            values,
            vec![
                FieldValue::String("a".into()),
                FieldValue::String("b".into()),
                FieldValue::Null
            ]
        );
    }
}
