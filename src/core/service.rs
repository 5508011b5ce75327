//! Entity and query services
//!
//! Services sit between the REST handlers and an [`EntityStore`], converting
//! between DTOs and entities through an [`EntityMapper`].

use crate::core::entity::{Entity, Identified};
use crate::core::error::{EntityError, PizzeriaResult};
use crate::core::filter::Criteria;
use crate::core::mapper::EntityMapper;
use crate::core::predicate::Predicate;
use crate::core::query::{Page, PageRequest};
use crate::core::store::EntityStore;
use std::marker::PhantomData;
use std::sync::Arc;

/// CRUD operations for the entity behind mapper `M`
pub struct CrudService<M: EntityMapper> {
    store: Arc<dyn EntityStore<M::Entity>>,
}

impl<M: EntityMapper> Clone for CrudService<M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<M: EntityMapper> CrudService<M> {
    pub fn new(store: Arc<dyn EntityStore<M::Entity>>) -> Self {
        Self { store }
    }

    fn entity_name() -> &'static str {
        M::Entity::resource_name_singular()
    }

    /// Persist a new record; the store assigns its identifier
    pub async fn save(&self, dto: M::Dto) -> PizzeriaResult<M::Dto> {
        tracing::debug!("Request to save {}", Self::entity_name());
        if dto.id().is_some() {
            return Err(EntityError::IdExists {
                entity_type: Self::entity_name().to_string(),
            }
            .into());
        }
        let saved = self.store.save(M::to_entity(dto)).await?;
        Ok(M::to_dto(saved))
    }

    /// Replace an existing record. The caller has checked that it exists.
    pub async fn update(&self, dto: M::Dto) -> PizzeriaResult<M::Dto> {
        tracing::debug!("Request to update {} {:?}", Self::entity_name(), dto.id());
        if dto.id().is_none() {
            return Err(EntityError::IdNull {
                entity_type: Self::entity_name().to_string(),
            }
            .into());
        }
        let saved = self.store.save(M::to_entity(dto)).await?;
        Ok(M::to_dto(saved))
    }

    /// Merge the present fields of `patch` into the stored record.
    ///
    /// Returns `None` when no record carries the patch's identifier.
    pub async fn partial_update(&self, patch: M::Patch) -> PizzeriaResult<Option<M::Dto>> {
        tracing::debug!(
            "Request to partially update {} {:?}",
            Self::entity_name(),
            patch.id()
        );
        let Some(id) = patch.id() else {
            return Err(EntityError::IdNull {
                entity_type: Self::entity_name().to_string(),
            }
            .into());
        };
        let Some(mut existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        M::partial_update(&mut existing, &patch);
        let saved = self.store.save(existing).await?;
        Ok(Some(M::to_dto(saved)))
    }

    /// One page of every record
    pub async fn find_all(
        &self,
        page: &PageRequest<<M::Entity as Entity>::Field>,
    ) -> PizzeriaResult<Page<M::Dto>> {
        tracing::debug!("Request to get all {}", M::Entity::resource_name());
        let page = self.store.find_page(&Predicate::always(), page).await?;
        Ok(page.map(M::to_dto))
    }

    pub async fn find_one(&self, id: i64) -> PizzeriaResult<Option<M::Dto>> {
        tracing::debug!("Request to get {} {}", Self::entity_name(), id);
        Ok(self.store.find_by_id(id).await?.map(M::to_dto))
    }

    pub async fn exists(&self, id: i64) -> PizzeriaResult<bool> {
        self.store.exists_by_id(id).await
    }

    /// Delete by identifier; deleting a missing record succeeds
    pub async fn delete(&self, id: i64) -> PizzeriaResult<()> {
        tracing::debug!("Request to delete {} {}", Self::entity_name(), id);
        self.store.delete_by_id(id).await
    }
}

/// Criteria-driven reads for the entity behind mapper `M`
pub struct QueryService<M: EntityMapper, C> {
    store: Arc<dyn EntityStore<M::Entity>>,
    _criteria: PhantomData<fn(C)>,
}

impl<M: EntityMapper, C> Clone for QueryService<M, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _criteria: PhantomData,
        }
    }
}

impl<M, C> QueryService<M, C>
where
    M: EntityMapper,
    C: Criteria<Field = <M::Entity as Entity>::Field>,
{
    pub fn new(store: Arc<dyn EntityStore<M::Entity>>) -> Self {
        Self {
            store,
            _criteria: PhantomData,
        }
    }

    /// Every matching record, ordered by id
    pub async fn find_by_criteria(&self, criteria: &C) -> PizzeriaResult<Vec<M::Dto>> {
        tracing::debug!("find by criteria : {:?}", criteria);
        let predicate = criteria.to_predicate();
        let entities = self.store.find_matching(&predicate, None).await?;
        Ok(M::to_dtos(entities))
    }

    /// One page of matching records
    pub async fn find_page_by_criteria(
        &self,
        criteria: &C,
        page: &PageRequest<C::Field>,
    ) -> PizzeriaResult<Page<M::Dto>> {
        tracing::debug!("find by criteria : {:?}, page: {:?}", criteria, page);
        let predicate = criteria.to_predicate();
        let page = self.store.find_page(&predicate, page).await?;
        Ok(page.map(M::to_dto))
    }

    pub async fn count_by_criteria(&self, criteria: &C) -> PizzeriaResult<u64> {
        tracing::debug!("count by criteria : {:?}", criteria);
        let predicate = criteria.to_predicate();
        self.store.count_matching(&predicate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PizzeriaError;
    use crate::core::filter::{RangeFilter, StringFilter};
    use crate::entities::topping::{
        Topping, ToppingCriteria, ToppingDto, ToppingPatch, ToppingQueryService, ToppingService,
    };
    use crate::storage::InMemoryStore;

    fn services() -> (ToppingService, ToppingQueryService) {
        let store = Arc::new(InMemoryStore::<Topping>::new());
        (CrudService::new(store.clone()), QueryService::new(store))
    }

    fn is_identity_error(err: &PizzeriaError, code: &str) -> bool {
        matches!(err, PizzeriaError::Entity(e) if e.error_code() == code)
    }

    #[tokio::test]
    async fn test_save_rejects_present_id() {
        let (service, _) = services();
        let mut dto = ToppingDto::new("Ham", 1.0);
        dto.id = Some(3);

        let err = service.save(dto).await.unwrap_err();
        assert!(is_identity_error(&err, "ID_EXISTS"));
        assert!(!service.exists(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let (service, _) = services();
        let err = service.update(ToppingDto::new("Ham", 1.0)).await.unwrap_err();
        assert!(is_identity_error(&err, "ID_NULL"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_absent_fields() {
        let (service, _) = services();
        let saved = service
            .save(ToppingDto::new("Ham", 1.0).with_description("smoked"))
            .await
            .unwrap();

        let patch = ToppingPatch {
            id: saved.id,
            price: Some(1.25),
            ..ToppingPatch::default()
        };
        let updated = service.partial_update(patch).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ham");
        assert_eq!(updated.price, 1.25);
        assert_eq!(updated.description.as_deref(), Some("smoked"));
    }

    #[tokio::test]
    async fn test_partial_update_of_missing_record_is_empty() {
        let (service, _) = services();
        let patch = ToppingPatch {
            id: Some(9),
            name: Some("Corn".into()),
            ..ToppingPatch::default()
        };
        assert!(service.partial_update(patch).await.unwrap().is_none());

        let err = service
            .partial_update(ToppingPatch::default())
            .await
            .unwrap_err();
        assert!(is_identity_error(&err, "ID_NULL"));
    }

    #[tokio::test]
    async fn test_delete_then_find_one() {
        let (service, _) = services();
        let saved = service.save(ToppingDto::new("Ham", 1.0)).await.unwrap();
        let id = saved.id.unwrap();

        assert_eq!(service.find_one(id).await.unwrap(), Some(saved));
        service.delete(id).await.unwrap();
        service.delete(id).await.unwrap();
        assert!(service.find_one(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_matches_criteria_listing() {
        let (service, query) = services();
        for (name, price) in [("Ham", 1.5), ("Olives", 0.5), ("Mushroom", 1.0)] {
            service.save(ToppingDto::new(name, price)).await.unwrap();
        }

        let criteria = ToppingCriteria {
            name: Some(StringFilter::containing("o")),
            price: Some(RangeFilter {
                less_than: Some(2.0),
                ..RangeFilter::default()
            }),
            ..ToppingCriteria::default()
        };
        let found = query.find_by_criteria(&criteria).await.unwrap();
        let names: Vec<&str> = found.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Mushroom"]);
        assert_eq!(
            query.count_by_criteria(&criteria).await.unwrap(),
            found.len() as u64
        );

        let everything = query
            .find_by_criteria(&ToppingCriteria::default())
            .await
            .unwrap();
        assert_eq!(everything.len(), 3);

        let absent = ToppingCriteria {
            name: Some(StringFilter::equal_to("Mushrooms")),
            ..ToppingCriteria::default()
        };
        assert_eq!(query.count_by_criteria(&absent).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_all_pages_by_id() {
        let (service, _) = services();
        for name in ["Ham", "Olives", "Basil"] {
            service.save(ToppingDto::new(name, 1.0)).await.unwrap();
        }
        let page = service.find_all(&PageRequest::new(1, 2)).await.unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].name, "Basil");
        assert_eq!(page.total_elements, 3);
    }
}
