//! Entity descriptor for Topping

use super::handlers::{ToppingAppState, count_toppings, list_toppings};
use super::ToppingMapper;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::rest;
use axum::{Router, routing::get};

/// Descriptor for the Topping entity
pub struct ToppingDescriptor {
    pub state: ToppingAppState,
}

impl ToppingDescriptor {
    pub fn new(state: ToppingAppState) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for ToppingDescriptor {
    fn entity_type(&self) -> &str {
        "topping"
    }

    fn plural(&self) -> &str {
        "toppings"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route(
                "/toppings",
                get(list_toppings).post(rest::create::<ToppingMapper>),
            )
            .route("/toppings/count", get(count_toppings))
            .route(
                "/toppings/{id}",
                get(rest::get_one::<ToppingMapper>)
                    .put(rest::update::<ToppingMapper>)
                    .patch(rest::partial_update::<ToppingMapper>)
                    .delete(rest::delete::<ToppingMapper>),
            )
            .with_state(self.state.clone())
    }
}
