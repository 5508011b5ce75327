//! In-memory entity store for testing and development

use crate::core::entity::Entity;
use crate::core::error::{PizzeriaResult, StorageError};
use crate::core::predicate::Predicate;
use crate::core::query::PageRequest;
use crate::core::store::EntityStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory store keyed by id
///
/// Uses RwLock for thread-safe access. Identifiers come from a sequence that
/// never hands out the same value twice, also across deletes.
pub struct InMemoryStore<E: Entity> {
    records: Arc<RwLock<BTreeMap<i64, E>>>,
    sequence: Arc<AtomicI64>,
}

impl<E: Entity> Clone for InMemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            sequence: self.sequence.clone(),
        }
    }
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            sequence: Arc::new(AtomicI64::new(0)),
        }
    }

    fn poisoned(e: impl std::fmt::Display) -> StorageError {
        StorageError::Unavailable {
            backend: format!("in_memory ({})", e),
        }
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Keep the sequence ahead of ids supplied by callers
    fn observe_id(&self, id: i64) {
        self.sequence.fetch_max(id, Ordering::SeqCst);
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryStore<E> {
    async fn find_by_id(&self, id: i64) -> PizzeriaResult<Option<E>> {
        let records = self.records.read().map_err(Self::poisoned)?;
        Ok(records.get(&id).cloned())
    }

    async fn save(&self, mut entity: E) -> PizzeriaResult<E> {
        let mut records = self.records.write().map_err(Self::poisoned)?;

        let id = match entity.id() {
            Some(id) => {
                self.observe_id(id);
                id
            }
            None => {
                let id = self.next_id();
                entity.assign_id(id);
                id
            }
        };
        records.insert(id, entity.clone());

        Ok(entity)
    }

    async fn delete_by_id(&self, id: i64) -> PizzeriaResult<()> {
        let mut records = self.records.write().map_err(Self::poisoned)?;
        records.remove(&id);
        Ok(())
    }

    async fn find_matching(
        &self,
        predicate: &Predicate<E::Field>,
        page: Option<&PageRequest<E::Field>>,
    ) -> PizzeriaResult<Vec<E>> {
        let records = self.records.read().map_err(Self::poisoned)?;

        // BTreeMap iteration is already ascending by id
        let mut matches: Vec<E> = records
            .values()
            .filter(|entity| predicate.matches(*entity))
            .cloned()
            .collect();

        let Some(page) = page else {
            return Ok(matches);
        };
        if !page.sort.is_empty() {
            matches.sort_by(|a, b| page.compare(a, b));
        }
        Ok(matches
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect())
    }

    async fn count_matching(&self, predicate: &Predicate<E::Field>) -> PizzeriaResult<u64> {
        let records = self.records.read().map_err(Self::poisoned)?;
        Ok(records
            .values()
            .filter(|entity| predicate.matches(*entity))
            .count() as u64)
    }
}
