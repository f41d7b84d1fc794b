use crate::model::Record;
use crate::store::error::StoreResult;

/// Whole-collection persistence for the catalog.
///
/// Every collection is an independent document holding an ordered sequence
/// of records. There is no transaction spanning collections and no locking:
/// a caller that loads, modifies and saves races with any other caller doing
/// the same on that collection.
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    /// Load the full collection. A collection that was never saved is empty.
    async fn load(&self, collection: &str) -> StoreResult<Vec<Record>>;

    /// Replace the full collection.
    async fn save(&self, collection: &str, records: &[Record]) -> StoreResult<()>;
}
