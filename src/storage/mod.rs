//! Entity store implementations
//!
//! - [`InMemoryStore`]: default, process-local, used by tests and development
//! - `PostgresStore`: behind the `postgres` feature

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PgRecord, PostgresStore};
