//! Entity definitions served by the API

pub mod macros;
pub mod pizza;
pub mod topping;

pub use pizza::{Pizza, PizzaDto, PizzaMapper, PizzaPatch, PizzaSize};
pub use topping::{Topping, ToppingCriteria, ToppingDto, ToppingMapper, ToppingPatch};
