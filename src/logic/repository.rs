use std::sync::Arc;

use serde_json::Value;

use crate::logic::error::{CatalogError, CatalogResult};
use crate::model::{generate_id, non_empty_str, EntityKind, EntitySpec, FieldKind, IdPolicy, Id, Record};
use crate::store::EntityStore;

/// CRUD access to one catalog collection.
///
/// Each mutating call is a single load/modify/save cycle over the whole
/// collection document. Nothing is locked between the load and the save.
pub struct Repository<S> {
    store: Arc<S>,
    spec: &'static EntitySpec,
}

impl<S> Clone for Repository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            spec: self.spec,
        }
    }
}

impl<S: EntityStore> Repository<S> {
    pub fn new(store: Arc<S>, kind: EntityKind) -> Self {
        Self {
            store,
            spec: kind.spec(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &'static EntitySpec {
        self.spec
    }

    pub async fn list_all(&self) -> CatalogResult<Vec<Record>> {
        Ok(self.store.load(self.spec.collection).await?)
    }

    pub async fn get_by_id(&self, id: &str) -> CatalogResult<Record> {
        self.list_all()
            .await?
            .into_iter()
            .find(|r| non_empty_str(r, self.spec.id_field) == Some(id))
            .ok_or_else(|| self.not_found(id))
    }

    /// Validate, assign the identity and append. Returns the stored record.
    pub async fn create(&self, payload: Record) -> CatalogResult<Record> {
        validate_payload(self.spec, &payload)?;

        let mut records = self.list_all().await?;
        let id = match self.client_id(&payload) {
            Some(id) => {
                if self.position(&records, id).is_some() {
                    return Err(CatalogError::DuplicateId {
                        entity: self.spec.kind,
                        id: id.to_string(),
                    });
                }
                id.to_string()
            }
            None => generate_id(),
        };

        let record = build_record(self.spec, &payload, id);
        records.push(record.clone());
        self.store.save(self.spec.collection, &records).await?;

        log::debug!(
            "Created {} '{}'",
            self.spec.display_name,
            record_id(self.spec, &record)
        );
        Ok(record)
    }

    /// Shallow merge: fields in `patch` overwrite, everything else is kept.
    /// The merged record is not re-validated, and the identity field itself
    /// can be overwritten through the patch.
    pub async fn update(&self, id: &str, patch: Record) -> CatalogResult<Record> {
        let mut records = self.list_all().await?;
        let index = self.position(&records, id).ok_or_else(|| self.not_found(id))?;

        let record = &mut records[index];
        for (key, value) in patch {
            record.insert(key, value);
        }
        let merged = record.clone();
        self.store.save(self.spec.collection, &records).await?;

        log::debug!("Updated {} '{}'", self.spec.display_name, id);
        Ok(merged)
    }

    /// Removes the record. Records referencing it elsewhere are left untouched.
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        let mut records = self.list_all().await?;
        let index = self.position(&records, id).ok_or_else(|| self.not_found(id))?;

        records.remove(index);
        self.store.save(self.spec.collection, &records).await?;

        log::debug!("Deleted {} '{}'", self.spec.display_name, id);
        Ok(())
    }

    fn client_id<'a>(&self, payload: &'a Record) -> Option<&'a str> {
        match self.spec.id_policy {
            IdPolicy::ClientOrGenerated => non_empty_str(payload, self.spec.id_field),
            IdPolicy::AlwaysGenerated => None,
        }
    }

    fn position(&self, records: &[Record], id: &str) -> Option<usize> {
        records
            .iter()
            .position(|r| non_empty_str(r, self.spec.id_field) == Some(id))
    }

    fn not_found(&self, id: &str) -> CatalogError {
        CatalogError::NotFound {
            entity: self.spec.kind,
            id: id.to_string(),
        }
    }
}

fn record_id<'a>(spec: &EntitySpec, record: &'a Record) -> &'a str {
    non_empty_str(record, spec.id_field).unwrap_or_default()
}

/// Checks a create payload against the entity's field table.
pub fn validate_payload(spec: &EntitySpec, payload: &Record) -> CatalogResult<()> {
    let missing: Vec<&'static str> = spec
        .required_fields()
        .filter(|field| match payload.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::MissingFields {
            entity: spec.kind,
            fields: missing,
        });
    }

    for field in spec.fields {
        let reason = match (field.kind, payload.get(field.name)) {
            (_, None) | (_, Some(Value::Null)) => continue,
            (FieldKind::Text, Some(Value::String(_))) => continue,
            (FieldKind::TextList, Some(Value::Array(items))) if items.iter().all(Value::is_string) => {
                continue
            }
            (FieldKind::Text, Some(_)) => "expected a string",
            (FieldKind::TextList, Some(_)) => "expected an array of strings",
        };
        return Err(CatalogError::InvalidField {
            entity: spec.kind,
            field: field.name,
            reason,
        });
    }

    Ok(())
}

/// Identity first, then recognized fields in table order, then (where the
/// entity keeps them) any other payload fields.
fn build_record(spec: &EntitySpec, payload: &Record, id: Id) -> Record {
    let mut record = Record::new();
    record.insert(spec.id_field.to_string(), Value::String(id));

    for field in spec.fields {
        match (field.kind, payload.get(field.name)) {
            (FieldKind::TextList, None | Some(Value::Null)) => {
                record.insert(field.name.to_string(), Value::Array(Vec::new()));
            }
            (_, Some(value)) => {
                record.insert(field.name.to_string(), value.clone());
            }
            (FieldKind::Text, None) => {}
        }
    }

    if spec.retain_unknown_fields {
        for (key, value) in payload {
            if key != spec.id_field && spec.field(key).is_none() {
                record.insert(key.clone(), value.clone());
            }
        }
    }

    record
}
