use itertools::Itertools;

use crate::model::{EntityKind, Id};
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Missing required field(s) for {entity}: {}", .fields.iter().join(", "))]
    MissingFields {
        entity: EntityKind,
        fields: Vec<&'static str>,
    },

    #[error("Invalid field '{field}' for {entity}: {reason}")]
    InvalidField {
        entity: EntityKind,
        field: &'static str,
        reason: &'static str,
    },

    #[error("{entity} with id '{id}' already exists")]
    DuplicateId { entity: EntityKind, id: Id },

    #[error("{entity} not found")]
    NotFound { entity: EntityKind, id: Id },

    /// Only raised inside the import pipeline, where it turns into a skip.
    #[error("{entity} references unresolved key '{key}'")]
    ReferenceUnresolved { entity: EntityKind, key: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CatalogError {
    /// Client-side payload problems: rejected before anything is written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingFields { .. }
                | CatalogError::InvalidField { .. }
                | CatalogError::DuplicateId { .. }
        )
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
