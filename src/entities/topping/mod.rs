//! Topping entity: name, price and optional description, queryable by
//! criteria

pub mod criteria;
pub mod descriptor;
pub mod dto;
pub mod handlers;
pub mod mapper;
pub mod model;

pub use criteria::ToppingCriteria;
pub use descriptor::ToppingDescriptor;
pub use dto::{ToppingDto, ToppingPatch};
pub use handlers::ToppingAppState;
pub use mapper::ToppingMapper;
pub use model::{Topping, ToppingField};

use crate::core::service::{CrudService, QueryService};

pub type ToppingService = CrudService<ToppingMapper>;
pub type ToppingQueryService = QueryService<ToppingMapper, ToppingCriteria>;
