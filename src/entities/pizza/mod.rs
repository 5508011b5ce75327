//! Pizza entity: a size and a price

pub mod descriptor;
pub mod dto;
pub mod mapper;
pub mod model;

pub use descriptor::PizzaDescriptor;
pub use dto::{PizzaDto, PizzaPatch};
pub use mapper::PizzaMapper;
pub use model::{Pizza, PizzaField, PizzaSize};

use crate::core::service::CrudService;

pub type PizzaService = CrudService<PizzaMapper>;
