//! Topping entity/DTO mapping

use super::dto::{ToppingDto, ToppingPatch};
use super::model::Topping;
use crate::core::mapper::EntityMapper;

pub struct ToppingMapper;

impl EntityMapper for ToppingMapper {
    type Entity = Topping;
    type Dto = ToppingDto;
    type Patch = ToppingPatch;

    fn to_entity(dto: ToppingDto) -> Topping {
        Topping {
            id: dto.id,
            name: dto.name,
            price: dto.price,
            description: dto.description,
        }
    }

    fn to_dto(entity: Topping) -> ToppingDto {
        ToppingDto {
            id: entity.id,
            name: entity.name,
            price: entity.price,
            description: entity.description,
        }
    }
}
