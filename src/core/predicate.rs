//! Composable query predicates
//!
//! A [`Predicate`] is a conjunction of field [`Condition`]s plus a `distinct`
//! flag. It is a plain value: the in-memory store evaluates it record by
//! record, the SQL store translates it into a `WHERE` clause. Listing and
//! counting always receive the same predicate, so both agree on which rows
//! match.

use crate::core::entity::{Entity, EntityField};
use crate::core::field::FieldValue;
use std::cmp::Ordering;

/// A single comparison applied to one field
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Equals(FieldValue),
    NotEquals(FieldValue),
    In(Vec<FieldValue>),
    GreaterThan(FieldValue),
    GreaterThanOrEqual(FieldValue),
    LessThan(FieldValue),
    LessThanOrEqual(FieldValue),
    /// `true` matches non-null values, `false` matches nulls
    Specified(bool),
    /// Case-sensitive substring match
    Contains(String),
    /// Negated case-sensitive substring match
    DoesNotContain(String),
}

impl Operator {
    /// Evaluate against a stored value.
    ///
    /// Null values only ever satisfy `Specified(false)`.
    pub fn test(&self, value: &FieldValue) -> bool {
        match self {
            Operator::Specified(specified) => value.is_null() != *specified,
            Operator::Equals(expected) => value.compare(expected) == Some(Ordering::Equal),
            Operator::NotEquals(expected) => {
                matches!(value.compare(expected), Some(ord) if ord != Ordering::Equal)
            }
            Operator::In(candidates) => candidates
                .iter()
                .any(|candidate| value.compare(candidate) == Some(Ordering::Equal)),
            Operator::GreaterThan(bound) => value.compare(bound) == Some(Ordering::Greater),
            Operator::GreaterThanOrEqual(bound) => {
                matches!(value.compare(bound), Some(Ordering::Greater | Ordering::Equal))
            }
            Operator::LessThan(bound) => value.compare(bound) == Some(Ordering::Less),
            Operator::LessThanOrEqual(bound) => {
                matches!(value.compare(bound), Some(Ordering::Less | Ordering::Equal))
            }
            Operator::Contains(needle) => value.as_string().is_some_and(|s| s.contains(needle)),
            Operator::DoesNotContain(needle) => {
                value.as_string().is_some_and(|s| !s.contains(needle))
            }
        }
    }
}

/// An operator bound to a field
#[derive(Debug, Clone, PartialEq)]
pub struct Condition<F> {
    pub field: F,
    pub operator: Operator,
}

impl<F: EntityField> Condition<F> {
    pub fn new(field: F, operator: Operator) -> Self {
        Self { field, operator }
    }
}

/// Something that compiles into conditions on a single field
pub trait Filter {
    fn conditions<F: EntityField>(&self, field: F) -> Vec<Condition<F>>;
}

/// Conjunction of conditions over the fields `F`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<F> {
    distinct: bool,
    conditions: Vec<Condition<F>>,
}

impl<F: EntityField> Predicate<F> {
    /// The predicate every record satisfies
    pub fn always() -> Self {
        Self {
            distinct: false,
            conditions: Vec::new(),
        }
    }

    /// Ask the store to deduplicate matching rows
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// AND one more condition into the predicate
    pub fn and(mut self, condition: Condition<F>) -> Self {
        self.conditions.push(condition);
        self
    }

    /// AND every condition of an optional filter; `None` contributes nothing
    pub fn and_filter<T: Filter>(mut self, field: F, filter: Option<&T>) -> Self {
        if let Some(filter) = filter {
            self.conditions.extend(filter.conditions(field));
        }
        self
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    /// Whether this predicate places no constraint on records
    pub fn is_always(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate against an entity
    pub fn matches<E: Entity<Field = F>>(&self, entity: &E) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.operator.test(&entity.field_value(condition.field)))
    }
}

impl<F: EntityField> Default for Predicate<F> {
    fn default() -> Self {
        Self::always()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> FieldValue {
        FieldValue::String(value.to_string())
    }

    #[test]
    fn test_equals_and_not_equals() {
        assert!(Operator::Equals(s("a")).test(&s("a")));
        assert!(!Operator::Equals(s("a")).test(&s("b")));
        assert!(Operator::NotEquals(s("a")).test(&s("b")));
        assert!(!Operator::NotEquals(s("a")).test(&s("a")));
    }

    #[test]
    fn test_null_rows_fail_everything_but_unspecified() {
        let null = FieldValue::Null;
        assert!(!Operator::Equals(s("a")).test(&null));
        assert!(!Operator::NotEquals(s("a")).test(&null));
        assert!(!Operator::In(vec![s("a")]).test(&null));
        assert!(!Operator::LessThan(FieldValue::Integer(3)).test(&null));
        assert!(!Operator::Contains("a".into()).test(&null));
        assert!(!Operator::DoesNotContain("a".into()).test(&null));
        assert!(!Operator::Specified(true).test(&null));
        assert!(Operator::Specified(false).test(&null));
    }

    #[test]
    fn test_ranges() {
        let price = FieldValue::Decimal(1.0);
        assert!(Operator::GreaterThanOrEqual(FieldValue::Decimal(1.0)).test(&price));
        assert!(!Operator::GreaterThan(FieldValue::Decimal(1.0)).test(&price));
        assert!(Operator::GreaterThan(FieldValue::Decimal(0.0)).test(&price));
        assert!(Operator::LessThanOrEqual(FieldValue::Decimal(1.0)).test(&price));
        assert!(!Operator::LessThan(FieldValue::Decimal(1.0)).test(&price));
        assert!(Operator::LessThan(FieldValue::Decimal(2.0)).test(&price));
    }

    #[test]
    fn test_in_set() {
        let op = Operator::In(vec![FieldValue::Integer(1), FieldValue::Integer(3)]);
        assert!(op.test(&FieldValue::Integer(3)));
        assert!(!op.test(&FieldValue::Integer(2)));
        assert!(!Operator::In(vec![]).test(&FieldValue::Integer(2)));
    }

    #[test]
    fn test_substring_is_case_sensitive() {
        assert!(Operator::Contains("pep".into()).test(&s("pepperoni")));
        assert!(!Operator::Contains("PEP".into()).test(&s("pepperoni")));
        assert!(Operator::DoesNotContain("PEP".into()).test(&s("pepperoni")));
        assert!(!Operator::DoesNotContain("roni".into()).test(&s("pepperoni")));
    }
}
