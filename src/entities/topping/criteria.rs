//! Topping criteria and their compilation into a predicate

use super::model::ToppingField;
use crate::core::error::QueryError;
use crate::core::filter::{Criteria, FilterOperator, RangeFilter, StringFilter, parse_flag};
use crate::core::predicate::Predicate;

/// Optional filters over every topping field
///
/// Built from query parameters such as `name.contains=pep` or
/// `price.lessThanOrEqual=2`. An absent filter places no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToppingCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub name: Option<StringFilter>,
    pub price: Option<RangeFilter<f64>>,
    pub description: Option<StringFilter>,
    pub distinct: Option<bool>,
}

impl ToppingCriteria {
    /// Collect criteria from decoded query pairs.
    ///
    /// `page`, `size`, `sort` and other parameters without a `.` are left
    /// alone. A dotted parameter naming an unknown field is rejected.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            if key == "distinct" {
                criteria.distinct = Some(parse_flag(key, value)?);
                continue;
            }
            let Some((field, suffix)) = key.split_once('.') else {
                continue;
            };
            let operator = FilterOperator::parse(field, suffix)?;
            match field {
                "id" => criteria
                    .id
                    .get_or_insert_with(Default::default)
                    .apply(field, operator, value)?,
                "name" => criteria
                    .name
                    .get_or_insert_with(Default::default)
                    .apply(field, operator, value)?,
                "price" => criteria
                    .price
                    .get_or_insert_with(Default::default)
                    .apply(field, operator, value)?,
                "description" => criteria
                    .description
                    .get_or_insert_with(Default::default)
                    .apply(field, operator, value)?,
                other => {
                    return Err(QueryError::UnknownField {
                        field: other.to_string(),
                    });
                }
            }
        }
        Ok(criteria)
    }
}

impl Criteria for ToppingCriteria {
    type Field = ToppingField;

    fn to_predicate(&self) -> Predicate<ToppingField> {
        let mut predicate = Predicate::always();
        if let Some(distinct) = self.distinct {
            predicate = predicate.distinct(distinct);
        }
        predicate
            .and_filter(ToppingField::Id, self.id.as_ref())
            .and_filter(ToppingField::Name, self.name.as_ref())
            .and_filter(ToppingField::Price, self.price.as_ref())
            .and_filter(ToppingField::Description, self.description.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::predicate::{Condition, Operator};
    use crate::entities::topping::model::Topping;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn topping(id: i64, name: &str, price: f64, description: Option<&str>) -> Topping {
        Topping {
            id: Some(id),
            name: name.into(),
            price,
            description: description.map(Into::into),
        }
    }

    #[test]
    fn test_empty_criteria_is_always_true() {
        let predicate = ToppingCriteria::default().to_predicate();
        assert!(predicate.is_always());
        assert!(!predicate.is_distinct());
        assert!(predicate.matches(&topping(1, "Ham", 1.0, None)));
    }

    #[test]
    fn test_fields_compile_in_fixed_order() {
        let criteria = ToppingCriteria::from_query_pairs(&pairs(&[
            ("description.specified", "true"),
            ("price.lessThan", "3"),
            ("name.contains", "am"),
            ("id.greaterThan", "0"),
        ]))
        .unwrap();
        let predicate = criteria.to_predicate();
        assert_eq!(
            predicate.conditions(),
            &[
                Condition::new(ToppingField::Id, Operator::GreaterThan(FieldValue::Integer(0))),
                Condition::new(ToppingField::Name, Operator::Contains("am".into())),
                Condition::new(ToppingField::Price, Operator::LessThan(FieldValue::Decimal(3.0))),
                Condition::new(ToppingField::Description, Operator::Specified(true)),
            ]
        );
    }

    #[test]
    fn test_distinct_is_carried() {
        let criteria =
            ToppingCriteria::from_query_pairs(&pairs(&[("distinct", "true")])).unwrap();
        assert_eq!(criteria.distinct, Some(true));
        assert!(criteria.to_predicate().is_distinct());
    }

    #[test]
    fn test_paging_parameters_are_ignored() {
        let criteria = ToppingCriteria::from_query_pairs(&pairs(&[
            ("page", "1"),
            ("size", "5"),
            ("sort", "name,desc"),
            ("cacheBuster", "123"),
        ]))
        .unwrap();
        assert_eq!(criteria, ToppingCriteria::default());
    }

    #[test]
    fn test_unknown_field_and_operator() {
        assert_eq!(
            ToppingCriteria::from_query_pairs(&pairs(&[("colour.equals", "red")])),
            Err(QueryError::UnknownField {
                field: "colour".into()
            })
        );
        assert!(matches!(
            ToppingCriteria::from_query_pairs(&pairs(&[("price.contains", "1")])),
            Err(QueryError::UnknownOperator { .. })
        ));
        assert!(matches!(
            ToppingCriteria::from_query_pairs(&pairs(&[("name.like", "H%")])),
            Err(QueryError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_predicate_semantics() {
        let ham = topping(1, "Ham", 1.5, Some("smoked"));
        let olives = topping(2, "Olives", 0.5, None);

        let criteria =
            ToppingCriteria::from_query_pairs(&pairs(&[("description.doesNotContain", "x")]))
                .unwrap();
        let predicate = criteria.to_predicate();
        assert!(predicate.matches(&ham));
        assert!(!predicate.matches(&olives));

        let criteria = ToppingCriteria::from_query_pairs(&pairs(&[
            ("description.specified", "false"),
            ("name.in", "Ham,Olives"),
        ]))
        .unwrap();
        let predicate = criteria.to_predicate();
        assert!(!predicate.matches(&ham));
        assert!(predicate.matches(&olives));

        let criteria = ToppingCriteria {
            name: Some(StringFilter::equal_to("ham")),
            ..ToppingCriteria::default()
        };
        assert!(!criteria.to_predicate().matches(&ham));
    }
}
