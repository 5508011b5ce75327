//! # Pizzeria
//!
//! A REST backend for two resources, pizzas and toppings, built on axum.
//!
//! ## Features
//!
//! - **CRUD for every entity**: create, full update, merge-patch update,
//!   paged listing, fetch and delete, with identity checks on every write
//! - **Criteria queries**: toppings are filtered with `field.operator=value`
//!   query parameters that turn into a storage-independent [`Predicate`]
//! - **Pluggable storage**: an in-memory store by default, PostgreSQL behind
//!   the `postgres` feature
//! - **Alert and pagination headers**: `X-{app}-Alert`, `X-Total-Count` and
//!   `Link` on the relevant responses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pizzeria::prelude::*;
//!
//! let config = AppConfig::load(None)?;
//! let stores = Stores::from_config(&config).await?;
//! let app = pizzeria::app::router(&config, stores)?;
//!
//! // GET /api/toppings?price.lessThan=2&name.contains=sh&sort=price,desc
//! ```
//!
//! [`Predicate`]: crate::core::predicate::Predicate

pub mod app;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Entity, EntityField, Identified},
        error::{PizzeriaError, PizzeriaResult},
        field::FieldValue,
        filter::{Criteria, FilterOperator, RangeFilter, StringFilter},
        mapper::{EntityMapper, Patch},
        predicate::{Condition, Filter, Operator, Predicate},
        query::{Direction, Page, PageRequest, Sort},
        service::{CrudService, QueryService},
        store::EntityStore,
        validation::ValidJson,
    };

    // === Macros ===
    pub use crate::{impl_entity, impl_identified, impl_identity_eq};

    // === Entities ===
    pub use crate::entities::{
        Pizza, PizzaDto, PizzaMapper, PizzaPatch, PizzaSize, Topping, ToppingCriteria, ToppingDto,
        ToppingMapper, ToppingPatch,
    };

    // === Server ===
    pub use crate::app::{Stores, router};
    pub use crate::config::AppConfig;
    pub use crate::server::{EntityDescriptor, HeaderUtil, RestState, ServerBuilder};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Re-exports from dependencies ===
    pub use async_trait::async_trait;
    pub use axum::Router;
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
