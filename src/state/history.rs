/// Transformation history store
///
/// Owns the bounded, most-recent-first collection of completed
/// transformation results. The in-memory copy is authoritative for the
/// session; every mutation also rewrites the full collection in durable
/// storage. A failed durable write is reported to the caller but never
/// rolls back the in-memory mutation — presenting slightly-less-durable
/// history beats discarding the user's result.

use chrono::Utc;
use uuid::Uuid;

use super::data::{HistoryItem, Transformation};
use super::store::{DurableStore, StoreError};

/// Fixed storage key for the serialized collection
pub const HISTORY_KEY: &str = "restyle.history.v1";

/// Maximum number of history items kept; oldest are evicted beyond this
pub const MAX_ITEMS: usize = 24;

/// Outcome of a mutating history operation
///
/// The in-memory update always succeeds; `persist` reports whether the
/// durable write went through.
#[derive(Debug)]
pub struct HistoryUpdate<T = ()> {
    pub value: T,
    pub persist: Result<(), StoreError>,
}

/// Owner of the history collection
pub struct HistoryStore {
    items: Vec<HistoryItem>,
    store: Box<dyn DurableStore>,
}

impl HistoryStore {
    /// Load the collection from durable storage
    ///
    /// An absent key starts an empty collection. A corrupted payload is
    /// reported and also starts empty — stale history is not worth
    /// refusing to launch over.
    pub fn load(store: Box<dyn DurableStore>) -> Self {
        let items = match store.get(HISTORY_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<HistoryItem>>(&json) {
                Ok(items) => items,
                Err(e) => {
                    eprintln!("⚠️  Discarding corrupted history payload: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("⚠️  Could not read history: {}", e);
                Vec::new()
            }
        };

        println!("🗂️  History loaded: {} item(s)", items.len());

        HistoryStore { items, store }
    }

    /// Record a completed transformation
    ///
    /// Creates a new item with a fresh unique id and current timestamp,
    /// prepends it, evicts the oldest item(s) beyond `MAX_ITEMS`, and
    /// persists the updated collection.
    pub fn add(
        &mut self,
        transformation: Transformation,
        result_image: impl Into<String>,
    ) -> HistoryUpdate<HistoryItem> {
        let item = HistoryItem {
            id: Uuid::new_v4().to_string(),
            transformation,
            result_image: result_image.into(),
            created_at: Utc::now().timestamp(),
        };

        self.items.insert(0, item.clone());
        self.items.truncate(MAX_ITEMS);

        HistoryUpdate {
            value: item,
            persist: self.persist(),
        }
    }

    /// Delete the item with the given id; no-op if absent
    pub fn remove(&mut self, id: &str) -> HistoryUpdate {
        self.items.retain(|item| item.id != id);
        HistoryUpdate {
            value: (),
            persist: self.persist(),
        }
    }

    /// Empty the collection
    pub fn clear_all(&mut self) -> HistoryUpdate {
        self.items.clear();
        HistoryUpdate {
            value: (),
            persist: self.persist(),
        }
    }

    /// Read-only, most-recent-first view of the collection
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Look up a single item by id
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Rewrite the full collection in durable storage
    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.items)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        self.store.set(HISTORY_KEY, &json)
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("items", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::super::data::StyleParams;
    use super::super::store::fakes::{FailingStore, MemoryStore};
    use super::*;

    fn style(id: &str) -> Transformation {
        Transformation {
            id: id.to_string(),
            name: id.to_string(),
            category: "test".to_string(),
            parameters: StyleParams::default(),
        }
    }

    #[test]
    fn test_add_prepends_most_recent_first() {
        let mut history = HistoryStore::load(Box::new(MemoryStore::default()));

        history.add(style("first"), "uri-1");
        history.add(style("second"), "uri-2");

        assert_eq!(history.items()[0].transformation.id, "second");
        assert_eq!(history.items()[1].transformation.id, "first");
    }

    #[test]
    fn test_cap_evicts_oldest_only() {
        let mut history = HistoryStore::load(Box::new(MemoryStore::default()));

        for i in 0..(MAX_ITEMS + 5) {
            history.add(style(&format!("s{i}")), format!("uri-{i}"));
            assert!(history.items().len() <= MAX_ITEMS);
        }

        assert_eq!(history.items().len(), MAX_ITEMS);
        // The newest survives at the front, the oldest five are gone
        assert_eq!(
            history.items()[0].transformation.id,
            format!("s{}", MAX_ITEMS + 4)
        );
        assert_eq!(
            history.items()[MAX_ITEMS - 1].transformation.id,
            "s5"
        );
    }

    #[test]
    fn test_ids_unique_across_interleavings() {
        let mut history = HistoryStore::load(Box::new(MemoryStore::default()));
        let mut seen = HashSet::new();

        for i in 0..6 {
            let update = history.add(style("s"), format!("uri-{i}"));
            assert!(seen.insert(update.value.id.clone()));
        }

        let victim = history.items()[3].id.clone();
        history.remove(&victim);
        history.clear_all();

        for i in 0..4 {
            let update = history.add(style("s"), format!("uri-{i}"));
            assert!(seen.insert(update.value.id.clone()));
        }

        let live: HashSet<&str> = history.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(live.len(), history.items().len());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut history = HistoryStore::load(Box::new(MemoryStore::default()));
        history.add(style("keep"), "uri");

        let update = history.remove("no-such-id");
        assert!(update.persist.is_ok());
        assert_eq!(history.items().len(), 1);
    }

    #[test]
    fn test_clear_all_persists_empty_state() {
        let mut history = HistoryStore::load(Box::new(MemoryStore::default()));
        history.add(style("a"), "uri-a");
        history.add(style("b"), "uri-b");

        let update = history.clear_all();
        assert!(update.persist.is_ok());
        assert!(history.items().is_empty());
    }

    #[test]
    fn test_reload_from_persisted_state() {
        // First session writes one item, second session reads it back
        let mut first = HistoryStore::load(Box::new(MemoryStore::default()));
        let update = first.add(style("survivor"), "uri");
        assert!(update.persist.is_ok());

        let persisted = first
            .store
            .get(HISTORY_KEY)
            .unwrap()
            .expect("first session should have persisted the collection");

        let reloaded = HistoryStore::load(Box::new(MemoryStore::with(HISTORY_KEY, &persisted)));
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].transformation.id, "survivor");
        assert_eq!(reloaded.items()[0].id, update.value.id);
    }

    #[test]
    fn test_corrupted_payload_starts_empty() {
        let backing = MemoryStore::with(HISTORY_KEY, "not json at all");
        let history = HistoryStore::load(Box::new(backing));
        assert!(history.items().is_empty());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_authoritative() {
        let mut history = HistoryStore::load(Box::new(FailingStore));

        for i in 0..3 {
            let update = history.add(style(&format!("s{i}")), format!("uri-{i}"));
            // The durable write fails but the in-memory mutation sticks
            assert!(update.persist.is_err());
        }

        assert_eq!(history.items().len(), 3);
    }
}
