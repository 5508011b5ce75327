//! Entity store abstraction
//!
//! Stores own persistence for one entity type. They assign identifiers on
//! first save and evaluate [`Predicate`]s for listing and counting. Every
//! operation is individually atomic; callers compose them without a
//! surrounding transaction.

use crate::core::entity::Entity;
use crate::core::error::PizzeriaResult;
use crate::core::predicate::Predicate;
use crate::core::query::{Page, PageRequest};
use async_trait::async_trait;

/// Keyed storage for records of type `E`
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// Point lookup by identifier
    async fn find_by_id(&self, id: i64) -> PizzeriaResult<Option<E>>;

    /// Whether a record with this identifier exists
    async fn exists_by_id(&self, id: i64) -> PizzeriaResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Insert or overwrite a record.
    ///
    /// An entity without an identifier receives a fresh one; an entity with
    /// one replaces the record stored under it. Returns the stored entity.
    async fn save(&self, entity: E) -> PizzeriaResult<E>;

    /// Delete by identifier. Missing records are not an error.
    async fn delete_by_id(&self, id: i64) -> PizzeriaResult<()>;

    /// Records matching the predicate, optionally paged and sorted.
    ///
    /// Without a page request every match is returned in ascending id order.
    async fn find_matching(
        &self,
        predicate: &Predicate<E::Field>,
        page: Option<&PageRequest<E::Field>>,
    ) -> PizzeriaResult<Vec<E>>;

    /// Number of records matching the predicate
    async fn count_matching(&self, predicate: &Predicate<E::Field>) -> PizzeriaResult<u64>;

    /// One page of matches together with the total match count
    async fn find_page(
        &self,
        predicate: &Predicate<E::Field>,
        page: &PageRequest<E::Field>,
    ) -> PizzeriaResult<Page<E>> {
        let content = self.find_matching(predicate, Some(page)).await?;
        let total = self.count_matching(predicate).await?;
        Ok(Page::new(content, page.page, page.size, total))
    }
}
