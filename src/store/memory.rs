use std::collections::HashMap;

use parking_lot::RwLock;

use crate::model::Record;
use crate::store::error::StoreResult;
use crate::store::traits::EntityStore;

/// In-process store. Used for dry-run imports and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held in a collection.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn load(&self, collection: &str) -> StoreResult<Vec<Record>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, collection: &str, records: &[Record]) -> StoreResult<()> {
        self.collections
            .write()
            .insert(collection.to_string(), records.to_vec());
        Ok(())
    }
}
