//! Pizza entity model

use crate::core::field::FieldValue;
use crate::impl_entity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size a pizza is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PizzaSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl PizzaSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PizzaSize::Small => "SMALL",
            PizzaSize::Medium => "MEDIUM",
            PizzaSize::Large => "LARGE",
            PizzaSize::ExtraLarge => "EXTRA_LARGE",
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored size name that is not a [`PizzaSize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPizzaSize(pub String);

impl fmt::Display for UnknownPizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown pizza size: {}", self.0)
    }
}

impl std::error::Error for UnknownPizzaSize {}

impl FromStr for PizzaSize {
    type Err = UnknownPizzaSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SMALL" => Ok(PizzaSize::Small),
            "MEDIUM" => Ok(PizzaSize::Medium),
            "LARGE" => Ok(PizzaSize::Large),
            "EXTRA_LARGE" => Ok(PizzaSize::ExtraLarge),
            other => Err(UnknownPizzaSize(other.to_string())),
        }
    }
}

impl From<PizzaSize> for FieldValue {
    fn from(size: PizzaSize) -> Self {
        FieldValue::String(size.as_str().to_string())
    }
}

impl_entity!(
    Pizza, "pizza", "pizzas",
    PizzaField {
        Size => size: PizzaSize = ("size", "pizza_size"),
        /// Never below 1
        Price => price: f64 = ("price", "price"),
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, EntityField};

    #[test]
    fn test_size_names() {
        assert_eq!(
            serde_json::to_string(&PizzaSize::ExtraLarge).unwrap(),
            "\"EXTRA_LARGE\""
        );
        assert_eq!("MEDIUM".parse::<PizzaSize>(), Ok(PizzaSize::Medium));
        assert!("medium".parse::<PizzaSize>().is_err());
    }

    #[test]
    fn test_identity_equality() {
        let mut a = Pizza::new(PizzaSize::Small, 10.0);
        let mut b = Pizza::new(PizzaSize::Large, 12.0);
        assert_ne!(a, b);
        assert_ne!(a, a.clone());

        a.assign_id(1);
        b.assign_id(1);
        assert_eq!(a, b);

        b.assign_id(2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_field_columns() {
        assert_eq!(PizzaField::Size.name(), "size");
        assert_eq!(PizzaField::Size.column(), "pizza_size");
        assert_eq!(PizzaField::from_name("price"), Some(PizzaField::Price));
        assert_eq!(PizzaField::all().len(), 3);

        let pizza = Pizza::new(PizzaSize::Medium, 9.5);
        assert_eq!(
            pizza.field_value(PizzaField::Size),
            FieldValue::String("MEDIUM".into())
        );
        assert!(pizza.field_value(PizzaField::Id).is_null());
    }
}
