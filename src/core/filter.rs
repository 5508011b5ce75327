//! Per-field filters and the criteria they are collected into
//!
//! Filters arrive as `<field>.<operator>=<value>` query parameters, for
//! example `price.greaterThan=2.5` or `name.in=Ham,Olives`. Each field of a
//! criteria type holds an optional filter; [`Criteria::to_predicate`] folds
//! the present ones into a single [`Predicate`].

use crate::core::entity::EntityField;
use crate::core::error::QueryError;
use crate::core::field::FieldValue;
use crate::core::predicate::{Condition, Filter, Operator, Predicate};
use std::fmt::Debug;
use std::str::FromStr;

/// Operator suffix of a filter parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Equals,
    NotEquals,
    In,
    Specified,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "notEquals",
            FilterOperator::In => "in",
            FilterOperator::Specified => "specified",
            FilterOperator::GreaterThan => "greaterThan",
            FilterOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            FilterOperator::LessThan => "lessThan",
            FilterOperator::LessThanOrEqual => "lessThanOrEqual",
            FilterOperator::Contains => "contains",
            FilterOperator::DoesNotContain => "doesNotContain",
        }
    }

    /// Parse the suffix of `<field>.<operator>`
    pub fn parse(field: &str, operator: &str) -> Result<Self, QueryError> {
        operator.parse().map_err(|_| QueryError::UnknownOperator {
            field: field.to_string(),
            operator: operator.to_string(),
        })
    }
}

impl FromStr for FilterOperator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(FilterOperator::Equals),
            "notEquals" => Ok(FilterOperator::NotEquals),
            "in" => Ok(FilterOperator::In),
            "specified" => Ok(FilterOperator::Specified),
            "greaterThan" => Ok(FilterOperator::GreaterThan),
            "greaterThanOrEqual" => Ok(FilterOperator::GreaterThanOrEqual),
            "lessThan" => Ok(FilterOperator::LessThan),
            "lessThanOrEqual" => Ok(FilterOperator::LessThanOrEqual),
            "contains" => Ok(FilterOperator::Contains),
            "doesNotContain" => Ok(FilterOperator::DoesNotContain),
            _ => Err(()),
        }
    }
}

/// A scalar that can be the operand of a filter
pub trait FilterValue: Clone + Debug + Send + Sync + Into<FieldValue> {
    fn parse_value(raw: &str) -> Result<Self, String>;
}

impl FilterValue for i64 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.trim().parse::<i64>().map_err(|e| e.to_string())
    }
}

impl FilterValue for f64 {
    fn parse_value(raw: &str) -> Result<Self, String> {
        let value = raw.trim().parse::<f64>().map_err(|e| e.to_string())?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err("expected a finite number".to_string())
        }
    }
}

impl FilterValue for String {
    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

/// Parse a `true`/`false` parameter such as `distinct` or `<field>.specified`
pub fn parse_flag(parameter: &str, raw: &str) -> Result<bool, QueryError> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(QueryError::InvalidValue {
            parameter: parameter.to_string(),
            value: other.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}

fn parse_operand<T: FilterValue>(parameter: &str, raw: &str) -> Result<T, QueryError> {
    T::parse_value(raw).map_err(|message| QueryError::InvalidValue {
        parameter: parameter.to_string(),
        value: raw.to_string(),
        message,
    })
}

/// Equality, membership, range and null checks over an ordered value
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub in_: Option<Vec<T>>,
    pub greater_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than: Option<T>,
    pub less_than_or_equal: Option<T>,
    pub specified: Option<bool>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_: None,
            greater_than: None,
            greater_than_or_equal: None,
            less_than: None,
            less_than_or_equal: None,
            specified: None,
        }
    }
}

impl<T: FilterValue> RangeFilter<T> {
    /// Filter with only `equals` set
    pub fn equal_to(value: T) -> Self {
        Self {
            equals: Some(value),
            ..Self::default()
        }
    }

    /// Record one `<field>.<operator>=<raw>` parameter.
    ///
    /// `in` values are comma separated and accumulate over repeated
    /// parameters; every other operator keeps the last value given.
    pub fn apply(
        &mut self,
        field: &str,
        operator: FilterOperator,
        raw: &str,
    ) -> Result<(), QueryError> {
        let parameter = format!("{}.{}", field, operator.as_str());
        match operator {
            FilterOperator::Equals => self.equals = Some(parse_operand(&parameter, raw)?),
            FilterOperator::NotEquals => self.not_equals = Some(parse_operand(&parameter, raw)?),
            FilterOperator::In => {
                let values = raw
                    .split(',')
                    .map(|part| parse_operand(&parameter, part))
                    .collect::<Result<Vec<T>, _>>()?;
                self.in_.get_or_insert_with(Vec::new).extend(values);
            }
            FilterOperator::GreaterThan => {
                self.greater_than = Some(parse_operand(&parameter, raw)?)
            }
            FilterOperator::GreaterThanOrEqual => {
                self.greater_than_or_equal = Some(parse_operand(&parameter, raw)?)
            }
            FilterOperator::LessThan => self.less_than = Some(parse_operand(&parameter, raw)?),
            FilterOperator::LessThanOrEqual => {
                self.less_than_or_equal = Some(parse_operand(&parameter, raw)?)
            }
            FilterOperator::Specified => self.specified = Some(parse_flag(&parameter, raw)?),
            FilterOperator::Contains | FilterOperator::DoesNotContain => {
                return Err(QueryError::UnknownOperator {
                    field: field.to_string(),
                    operator: operator.as_str().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<T: FilterValue> Filter for RangeFilter<T> {
    fn conditions<F: EntityField>(&self, field: F) -> Vec<Condition<F>> {
        let mut conditions = Vec::new();
        let mut push = |operator: Operator| conditions.push(Condition::new(field, operator));

        if let Some(value) = &self.equals {
            push(Operator::Equals(value.clone().into()));
        }
        if let Some(value) = &self.not_equals {
            push(Operator::NotEquals(value.clone().into()));
        }
        if let Some(values) = &self.in_ {
            push(Operator::In(values.iter().cloned().map(Into::into).collect()));
        }
        if let Some(value) = &self.greater_than {
            push(Operator::GreaterThan(value.clone().into()));
        }
        if let Some(value) = &self.greater_than_or_equal {
            push(Operator::GreaterThanOrEqual(value.clone().into()));
        }
        if let Some(value) = &self.less_than {
            push(Operator::LessThan(value.clone().into()));
        }
        if let Some(value) = &self.less_than_or_equal {
            push(Operator::LessThanOrEqual(value.clone().into()));
        }
        if let Some(specified) = self.specified {
            push(Operator::Specified(specified));
        }
        conditions
    }
}

/// [`RangeFilter`] over text plus case-sensitive substring matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    pub range: RangeFilter<String>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn equal_to(value: impl Into<String>) -> Self {
        Self {
            range: RangeFilter::equal_to(value.into()),
            ..Self::default()
        }
    }

    pub fn containing(value: impl Into<String>) -> Self {
        Self {
            contains: Some(value.into()),
            ..Self::default()
        }
    }

    /// Record one `<field>.<operator>=<raw>` parameter; raw text is kept as-is
    pub fn apply(
        &mut self,
        field: &str,
        operator: FilterOperator,
        raw: &str,
    ) -> Result<(), QueryError> {
        match operator {
            FilterOperator::Contains => self.contains = Some(raw.to_string()),
            FilterOperator::DoesNotContain => self.does_not_contain = Some(raw.to_string()),
            _ => self.range.apply(field, operator, raw)?,
        }
        Ok(())
    }
}

impl Filter for StringFilter {
    fn conditions<F: EntityField>(&self, field: F) -> Vec<Condition<F>> {
        let mut conditions = self.range.conditions(field);
        if let Some(needle) = &self.contains {
            conditions.push(Condition::new(field, Operator::Contains(needle.clone())));
        }
        if let Some(needle) = &self.does_not_contain {
            conditions.push(Condition::new(
                field,
                Operator::DoesNotContain(needle.clone()),
            ));
        }
        conditions
    }
}

/// Client-supplied per-field filters for one entity type
pub trait Criteria: Debug + Send + Sync {
    type Field: EntityField;

    /// Fold every present filter into one predicate
    fn to_predicate(&self) -> Predicate<Self::Field>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Price;

    impl EntityField for Price {
        fn all() -> &'static [Self] {
            &[Price]
        }
        fn id() -> Self {
            Price
        }
        fn name(&self) -> &'static str {
            "price"
        }
        fn column(&self) -> &'static str {
            "price"
        }
    }

    #[test]
    fn test_operator_suffixes() {
        assert_eq!(
            FilterOperator::parse("price", "greaterThanOrEqual"),
            Ok(FilterOperator::GreaterThanOrEqual)
        );
        assert_eq!(
            FilterOperator::parse("price", "like"),
            Err(QueryError::UnknownOperator {
                field: "price".into(),
                operator: "like".into()
            })
        );
    }

    #[test]
    fn test_in_accumulates_and_trims_numbers() {
        let mut filter = RangeFilter::<i64>::default();
        filter.apply("id", FilterOperator::In, "1, 2").unwrap();
        filter.apply("id", FilterOperator::In, "5").unwrap();
        assert_eq!(filter.in_, Some(vec![1, 2, 5]));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let mut filter = RangeFilter::<f64>::default();
        let err = filter
            .apply("price", FilterOperator::LessThan, "cheap")
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { ref parameter, .. } if parameter == "price.lessThan"));
    }

    #[test]
    fn test_substring_operators_need_text() {
        let mut filter = RangeFilter::<f64>::default();
        assert!(matches!(
            filter.apply("price", FilterOperator::Contains, "1"),
            Err(QueryError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_string_values_keep_whitespace() {
        let mut filter = StringFilter::default();
        filter.apply("name", FilterOperator::Equals, " Ham ").unwrap();
        filter.apply("name", FilterOperator::DoesNotContain, "x").unwrap();
        assert_eq!(filter.range.equals.as_deref(), Some(" Ham "));
        assert_eq!(filter.does_not_contain.as_deref(), Some("x"));
    }

    #[test]
    fn test_unset_operators_contribute_nothing() {
        assert!(RangeFilter::<f64>::default().conditions(Price).is_empty());
        assert!(StringFilter::default().conditions(Price).is_empty());
    }

    #[test]
    fn test_conditions_follow_operator_order() {
        let filter = RangeFilter {
            greater_than: Some(1.0),
            less_than: Some(3.0),
            specified: Some(true),
            ..RangeFilter::default()
        };
        let operators: Vec<Operator> = filter
            .conditions(Price)
            .into_iter()
            .map(|c| c.operator)
            .collect();
        assert_eq!(
            operators,
            vec![
                Operator::GreaterThan(FieldValue::Decimal(1.0)),
                Operator::LessThan(FieldValue::Decimal(3.0)),
                Operator::Specified(true),
            ]
        );
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse_flag("distinct", "true"), Ok(true));
        assert_eq!(parse_flag("distinct", " false"), Ok(false));
        assert!(parse_flag("distinct", "yes").is_err());
    }
}
