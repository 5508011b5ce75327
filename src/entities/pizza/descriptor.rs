//! Entity descriptor for Pizza

use super::PizzaMapper;
use crate::server::entity_registry::EntityDescriptor;
use crate::server::rest::{self, RestState};
use axum::{Router, routing::get};

/// Descriptor for the Pizza entity
pub struct PizzaDescriptor {
    pub state: RestState<PizzaMapper>,
}

impl PizzaDescriptor {
    pub fn new(state: RestState<PizzaMapper>) -> Self {
        Self { state }
    }
}

impl EntityDescriptor for PizzaDescriptor {
    fn entity_type(&self) -> &str {
        "pizza"
    }

    fn plural(&self) -> &str {
        "pizzas"
    }

    fn build_routes(&self) -> Router {
        Router::new()
            .route(
                "/pizzas",
                get(rest::list::<PizzaMapper>).post(rest::create::<PizzaMapper>),
            )
            .route(
                "/pizzas/{id}",
                get(rest::get_one::<PizzaMapper>)
                    .put(rest::update::<PizzaMapper>)
                    .patch(rest::partial_update::<PizzaMapper>)
                    .delete(rest::delete::<PizzaMapper>),
            )
            .with_state(self.state.clone())
    }
}
