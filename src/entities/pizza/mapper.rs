//! Pizza entity/DTO mapping

use super::dto::{PizzaDto, PizzaPatch};
use super::model::Pizza;
use crate::core::mapper::EntityMapper;

pub struct PizzaMapper;

impl EntityMapper for PizzaMapper {
    type Entity = Pizza;
    type Dto = PizzaDto;
    type Patch = PizzaPatch;

    fn to_entity(dto: PizzaDto) -> Pizza {
        Pizza {
            id: dto.id,
            size: dto.size,
            price: dto.price,
        }
    }

    fn to_dto(entity: Pizza) -> PizzaDto {
        PizzaDto {
            id: entity.id,
            size: entity.size,
            price: entity.price,
        }
    }
}
