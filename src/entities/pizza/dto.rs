//! Pizza wire types

use super::model::PizzaSize;
use crate::core::mapper::{Patch, merge};
use crate::entities::pizza::model::Pizza;
use crate::{impl_identified, impl_identity_eq};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full representation of a pizza
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PizzaDto {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(alias = "pizzaSize")]
    pub size: PizzaSize,

    #[validate(range(min = 1.0, message = "price must be at least 1"))]
    pub price: f64,
}

impl PizzaDto {
    pub fn new(size: PizzaSize, price: f64) -> Self {
        Self {
            id: None,
            size,
            price,
        }
    }
}

/// Merge-patch body: absent or null fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PizzaPatch {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, alias = "pizzaSize")]
    pub size: Option<PizzaSize>,

    #[serde(default)]
    #[validate(range(min = 1.0, message = "price must be at least 1"))]
    pub price: Option<f64>,
}

impl Patch<Pizza> for PizzaPatch {
    fn apply_to(&self, pizza: &mut Pizza) {
        merge(&mut pizza.size, &self.size);
        merge(&mut pizza.price, &self.price);
    }
}

impl_identified!(PizzaDto, PizzaPatch);
impl_identity_eq!(PizzaDto);
