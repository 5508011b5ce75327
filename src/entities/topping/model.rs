//! Topping entity model

use crate::impl_entity;

impl_entity!(
    Topping, "topping", "toppings",
    ToppingField {
        /// At least two characters
        Name => name: String = ("name", "name"),
        Price => price: f64 = ("price", "price"),
        Description => description: Option<String> = ("description", "description"),
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, EntityField};
    use crate::core::field::FieldValue;

    #[test]
    fn test_unsaved_toppings_are_never_equal() {
        let a = Topping::new("Ham".into(), 1.5, None);
        let b = a.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_id_means_same_topping() {
        let mut a = Topping::new("Ham".into(), 1.5, None);
        let mut b = Topping::new("Olives".into(), 0.5, Some("green".into()));
        a.assign_id(7);
        b.assign_id(7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_values() {
        let topping = Topping {
            id: Some(3),
            name: "Basil".into(),
            price: 0.25,
            description: None,
        };
        assert_eq!(topping.field_value(ToppingField::Id), FieldValue::Integer(3));
        assert_eq!(
            topping.field_value(ToppingField::Name),
            FieldValue::String("Basil".into())
        );
        assert_eq!(
            topping.field_value(ToppingField::Price),
            FieldValue::Decimal(0.25)
        );
        assert!(topping.field_value(ToppingField::Description).is_null());
        assert_eq!(ToppingField::from_name("description"), Some(ToppingField::Description));
        assert_eq!(ToppingField::from_name("colour"), None);
    }
}
