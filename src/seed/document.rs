use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::Record;
use crate::seed::import::ImportError;

/// Denormalized bulk-import input.
///
/// Cross-references use human-readable keys instead of generated ids: a
/// subcategory names its category by name, an object names its acquisition
/// as `acquisition_N`, and an exhibit grouping lists objects as `object_N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDocument {
    #[serde(default)]
    pub categories: Vec<Record>,
    #[serde(default)]
    pub subcategories: Vec<Record>,
    #[serde(default)]
    pub acquisitions: Vec<Record>,
    #[serde(default)]
    pub objects: Vec<Record>,
    #[serde(default)]
    pub exhibit_groupings: Vec<Record>,
}

impl SeedDocument {
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| ImportError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn total_records(&self) -> usize {
        self.categories.len()
            + self.subcategories.len()
            + self.acquisitions.len()
            + self.objects.len()
            + self.exhibit_groupings.len()
    }
}
