//! Topping wire types

use super::model::Topping;
use crate::core::mapper::{Patch, merge, merge_optional};
use crate::{impl_identified, impl_identity_eq};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Full representation of a topping
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToppingDto {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,

    pub price: f64,

    #[serde(default)]
    pub description: Option<String>,
}

impl ToppingDto {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Merge-patch body: absent or null fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ToppingPatch {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Patch<Topping> for ToppingPatch {
    fn apply_to(&self, topping: &mut Topping) {
        merge(&mut topping.name, &self.name);
        merge(&mut topping.price, &self.price);
        merge_optional(&mut topping.description, &self.description);
    }
}

impl_identified!(ToppingDto, ToppingPatch);
impl_identity_eq!(ToppingDto);
