use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::model::Record;
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::EntityStore;

/// Stores each collection as a pretty-printed JSON array in
/// `<data_dir>/<collection>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }
}

#[async_trait::async_trait]
impl EntityStore for JsonFileStore {
    async fn load(&self, collection: &str) -> StoreResult<Vec<Record>> {
        let path = self.collection_path(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    collection: collection.to_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Serialization {
            collection: collection.to_string(),
            source,
        })
    }

    async fn save(&self, collection: &str, records: &[Record]) -> StoreResult<()> {
        let body =
            serde_json::to_vec_pretty(records).map_err(|source| StoreError::Serialization {
                collection: collection.to_string(),
                source,
            })?;

        let io_err = |source: std::io::Error| StoreError::Io {
            collection: collection.to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(io_err)?;
        tokio::fs::write(self.collection_path(collection), body)
            .await
            .map_err(io_err)?;

        log::debug!("Saved {} record(s) to '{}'", records.len(), collection);
        Ok(())
    }
}
