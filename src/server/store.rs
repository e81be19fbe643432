use crate::models::{Property, PropertyDraft};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<i64, Property>,
}

/// In-memory property collection. Ids are assigned from 1 upwards and never reused.
#[derive(Default)]
pub struct PropertyStore {
    inner: RwLock<Inner>,
}

impl PropertyStore {
    /// All records in ascending id order
    pub async fn find_all(&self) -> Vec<Property> {
        self.inner.read().await.records.values().cloned().collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Option<Property> {
        self.inner.read().await.records.get(&id).cloned()
    }

    pub async fn create(&self, draft: PropertyDraft) -> Property {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let property = draft.into_property(inner.last_id);
        inner.records.insert(property.id, property.clone());
        property
    }

    /// Replace an existing record; `None` when the id is unknown
    pub async fn update(&self, id: i64, draft: PropertyDraft) -> Option<Property> {
        let mut inner = self.inner.write().await;
        let slot = inner.records.get_mut(&id)?;
        *slot = draft.into_property(id);
        Some(slot.clone())
    }

    /// Remove a record if present
    pub async fn delete(&self, id: i64) -> bool {
        self.inner.write().await.records.remove(&id).is_some()
    }
}
