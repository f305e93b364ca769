// crates/adapt/src/store/mem.rs

use std::collections::HashMap;

use domain::{Entity, Filter};
use parking_lot::Mutex;
use tracing::debug;

use crate::store::Store;
use crate::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// In-memory Store implementation
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory store evaluating filters directly against typed entities.
///
/// One lock is held for the duration of each operation.
#[derive(Debug)]
pub struct DictStore<E> {
    entities: Mutex<HashMap<String, E>>,
}

impl<E: Entity> DictStore<E> {
    pub fn new() -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.lock().is_empty()
    }

    /// Stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entities.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn upsert(&self, entity: &E, key: &str) {
        self.entities.lock().insert(key.to_string(), entity.clone());
    }
}

impl<E: Entity> Default for DictStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> FromIterator<(String, E)> for DictStore<E> {
    fn from_iter<I: IntoIterator<Item = (String, E)>>(iter: I) -> Self {
        Self {
            entities: Mutex::new(iter.into_iter().collect()),
        }
    }
}

impl<E: Entity> Store<E> for DictStore<E> {
    fn get(&self, key: &str) -> Result<E> {
        self.entities
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::entity_not_found(key))
    }

    fn create(&self, entity: &E, key: &str) -> Result<()> {
        debug!(entity = E::entity_name(), key, "create");
        self.upsert(entity, key);
        Ok(())
    }

    fn update(&self, entity: &E, key: &str) -> Result<()> {
        debug!(entity = E::entity_name(), key, "update");
        self.upsert(entity, key);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        debug!(entity = E::entity_name(), key, "delete");
        self.entities
            .lock()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::entity_not_found(key))
    }

    fn read(&self, filters: &[Filter]) -> Result<Vec<E>> {
        debug!(entity = E::entity_name(), filters = filters.len(), "read");
        let entities = self.entities.lock();
        Ok(entities
            .values()
            .filter(|e| filters.iter().all(|f| f.evaluate(*e)))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{dt, entities, field, Item};

    fn loaded() -> DictStore<Item> {
        entities().into_iter().map(|e| (e.key.clone(), e)).collect()
    }

    fn keys(store: &DictStore<Item>, filters: &[Filter]) -> Vec<String> {
        let mut keys: Vec<String> = store
            .read(filters)
            .unwrap()
            .into_iter()
            .map(|e| e.key)
            .collect();
        keys.sort();
        keys
    }

    // ─────────────────────────────────────────────────────────────
    // CRUD
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn create_then_get() {
        let store = DictStore::<Item>::new();
        let item = entities().remove(0);
        store.create(&item, "1").unwrap();
        assert_eq!(store.get("1").unwrap(), item);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_and_update_are_upserts() {
        let store = loaded();
        let mut item = store.get("2").unwrap();
        item.count = 40;
        store.create(&item, "2").unwrap();
        assert_eq!(store.get("2").unwrap().count, 40);

        item.count = 41;
        store.update(&item, "new").unwrap();
        assert_eq!(store.get("new").unwrap().count, 41);
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn delete_removes_and_reports_missing_keys() {
        let store = loaded();
        store.delete("1").unwrap();
        assert!(store.get("1").unwrap_err().is_not_found());
        assert!(matches!(
            store.delete("1"),
            Err(Error::EntityNotFound { key }) if key == "1"
        ));
        assert_eq!(store.keys(), ["2", "3", "4", "5"]);
    }

    // ─────────────────────────────────────────────────────────────
    // read
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn empty_filter_list_returns_everything() {
        let store = loaded();
        assert_eq!(keys(&store, &[]), ["1", "2", "3", "4", "5"]);
        assert!(DictStore::<Item>::new().read(&[]).unwrap().is_empty());
    }

    #[test]
    fn filters_are_anded() {
        let store = loaded();
        let filters = [
            Filter::greater_than(field("count"), 1).unwrap(),
            Filter::less_than(field("timestamp"), dt(2024, 2, 1)).unwrap(),
        ];
        assert_eq!(keys(&store, &filters), ["2", "3"]);
    }

    #[test]
    fn or_inside_the_list() {
        let store = loaded();
        let filters = [
            Filter::or(vec![
                Filter::is(field("count"), 1).unwrap(),
                Filter::is(field("count"), 4).unwrap(),
            ]),
            Filter::exists(field("name")),
        ];
        assert_eq!(keys(&store, &filters), ["1", "4"]);
    }
}
