//! Core traits and types: entities, predicates, stores and services

pub mod entity;
pub mod error;
pub mod field;
pub mod filter;
pub mod mapper;
pub mod predicate;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use entity::{Entity, EntityField, Identified};
pub use error::{PizzeriaError, PizzeriaResult};
pub use field::FieldValue;
pub use filter::{Criteria, FilterOperator, RangeFilter, StringFilter};
pub use mapper::{EntityMapper, Patch, apply_patch};
pub use predicate::{Condition, Filter, Operator, Predicate};
pub use query::{Direction, Page, PageRequest, Sort};
pub use service::{CrudService, QueryService};
pub use store::EntityStore;
pub use validation::ValidJson;
