//! Entity/DTO mapping and merge-patch support

use crate::core::entity::{Entity, Identified};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

/// A partial update: every `Some` field overwrites, every `None` is kept
pub trait Patch<E>: Send + Sync {
    fn apply_to(&self, target: &mut E);
}

/// Apply a patch in place. The identifier of `target` is never touched.
pub fn apply_patch<E, P: Patch<E> + ?Sized>(target: &mut E, patch: &P) {
    patch.apply_to(target);
}

/// Overwrite `target` when the patch carries a value
pub fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Same as [`merge`] for an optional target field
pub fn merge_optional<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

/// Stateless conversion between an entity and its wire types
pub trait EntityMapper: Send + Sync + 'static {
    type Entity: Entity;

    /// Full representation used for create, update and reads
    type Dto: Serialize
        + DeserializeOwned
        + Validate
        + Identified
        + Clone
        + Send
        + Sync
        + 'static;

    /// All-optional representation used for partial updates
    type Patch: Patch<Self::Entity>
        + DeserializeOwned
        + Validate
        + Identified
        + Send
        + Sync
        + 'static;

    fn to_entity(dto: Self::Dto) -> Self::Entity;

    fn to_dto(entity: Self::Entity) -> Self::Dto;

    fn to_dtos(entities: Vec<Self::Entity>) -> Vec<Self::Dto> {
        entities.into_iter().map(Self::to_dto).collect()
    }

    /// Merge a patch into an existing entity
    fn partial_update(existing: &mut Self::Entity, patch: &Self::Patch) {
        apply_patch(existing, patch);
    }
}
