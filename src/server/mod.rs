//! HTTP layer: router assembly, generic REST handlers and response headers
//!
//! Entities register an [`EntityDescriptor`] with the [`ServerBuilder`],
//! which nests their routes under the configured base path next to the
//! health check.

pub mod builder;
pub mod entity_registry;
pub mod headers;
pub mod rest;

pub use builder::ServerBuilder;
pub use entity_registry::{EntityDescriptor, EntityRegistry};
pub use headers::{HeaderUtil, pagination_headers};
pub use rest::RestState;
