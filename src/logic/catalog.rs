use std::sync::Arc;

use crate::logic::repository::Repository;
use crate::model::EntityKind;
use crate::store::EntityStore;

/// The five repositories over one shared store.
pub struct Catalog<S> {
    store: Arc<S>,
}

impl<S> Clone for Catalog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> Catalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn repository(&self, kind: EntityKind) -> Repository<S> {
        Repository::new(Arc::clone(&self.store), kind)
    }

    pub fn categories(&self) -> Repository<S> {
        self.repository(EntityKind::Category)
    }

    pub fn subcategories(&self) -> Repository<S> {
        self.repository(EntityKind::Subcategory)
    }

    pub fn acquisitions(&self) -> Repository<S> {
        self.repository(EntityKind::Acquisition)
    }

    pub fn objects(&self) -> Repository<S> {
        self.repository(EntityKind::Object)
    }

    pub fn exhibit_groupings(&self) -> Repository<S> {
        self.repository(EntityKind::ExhibitGrouping)
    }
}
