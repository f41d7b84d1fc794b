use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::logic::{
    positional_key, Catalog, CatalogError, Repository, Resolution, ResolutionMap,
};
use crate::model::{non_empty_str, record_label, EntityKind, Id, Record};
use crate::seed::document::SeedDocument;
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStage {
    Categories,
    Subcategories,
    Acquisitions,
    Objects,
    ExhibitGroupings,
}

impl ImportStage {
    pub const ORDER: [ImportStage; 5] = [
        ImportStage::Categories,
        ImportStage::Subcategories,
        ImportStage::Acquisitions,
        ImportStage::Objects,
        ImportStage::ExhibitGroupings,
    ];

    pub fn entity(self) -> EntityKind {
        match self {
            ImportStage::Categories => EntityKind::Category,
            ImportStage::Subcategories => EntityKind::Subcategory,
            ImportStage::Acquisitions => EntityKind::Acquisition,
            ImportStage::Objects => EntityKind::Object,
            ImportStage::ExhibitGroupings => EntityKind::ExhibitGrouping,
        }
    }
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImportStage::Categories => "categories",
            ImportStage::Subcategories => "subcategories",
            ImportStage::Acquisitions => "acquisitions",
            ImportStage::Objects => "objects",
            ImportStage::ExhibitGroupings => "exhibit groupings",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read seed document {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed document {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A create failed; everything created before it stays persisted.
    #[error("import stopped while creating {stage} ('{label}'): {source}")]
    Stage {
        stage: ImportStage,
        label: String,
        #[source]
        source: CatalogError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: ImportStage,
    pub created: usize,
    pub skipped: usize,
}

/// A seed record left out because its parent reference did not resolve.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub stage: ImportStage,
    /// 1-indexed position in the seed section.
    pub position: usize,
    pub label: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageSummary>,
    pub skipped: Vec<SkippedRecord>,
    /// Exhibit grouping object references that did not resolve and were dropped.
    pub dropped_object_references: usize,
}

impl ImportReport {
    fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stages: ImportStage::ORDER
                .iter()
                .map(|&stage| StageSummary {
                    stage,
                    created: 0,
                    skipped: 0,
                })
                .collect(),
            skipped: Vec::new(),
            dropped_object_references: 0,
        }
    }

    fn summary_mut(&mut self, stage: ImportStage) -> &mut StageSummary {
        let index = ImportStage::ORDER
            .iter()
            .position(|s| *s == stage)
            .unwrap_or_default();
        &mut self.stages[index]
    }

    fn record_created(&mut self, stage: ImportStage) {
        self.summary_mut(stage).created += 1;
    }

    fn record_skipped(&mut self, skipped: SkippedRecord) {
        self.summary_mut(skipped.stage).skipped += 1;
        self.skipped.push(skipped);
    }

    pub fn created(&self, stage: ImportStage) -> usize {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.created)
            .unwrap_or(0)
    }

    pub fn skipped_in(&self, stage: ImportStage) -> usize {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.skipped)
            .unwrap_or(0)
    }

    pub fn total_created(&self) -> usize {
        self.stages.iter().map(|s| s.created).sum()
    }
}

/// Replays a seed document into the catalog in dependency order.
///
/// Each stage finishes before the next one starts, since the next stage
/// rewrites its references through the id map the previous stage built.
/// Records whose parent reference does not resolve are skipped; any
/// repository error stops the import with earlier stages already persisted.
pub struct ImportPipeline<S> {
    catalog: Catalog<S>,
}

impl<S: EntityStore> ImportPipeline<S> {
    pub fn new(catalog: Catalog<S>) -> Self {
        Self { catalog }
    }

    pub async fn run(&self, seed: &SeedDocument) -> Result<ImportReport, ImportError> {
        let mut report = ImportReport::start();
        log::info!("Importing seed document with {} record(s)", seed.total_records());

        let categories = self.import_categories(&seed.categories, &mut report).await?;
        self.import_subcategories(&seed.subcategories, &categories, &mut report)
            .await?;
        let acquisitions = self
            .import_acquisitions(&seed.acquisitions, &mut report)
            .await?;
        let objects = self
            .import_objects(&seed.objects, &acquisitions, &mut report)
            .await?;
        self.import_exhibit_groupings(&seed.exhibit_groupings, &objects, &mut report)
            .await?;

        report.finished_at = Some(Utc::now());
        log::info!(
            "Data preload completed: {} created, {} skipped",
            report.total_created(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Category map: lowercased name -> categoryId.
    async fn import_categories(
        &self,
        categories: &[Record],
        report: &mut ImportReport,
    ) -> Result<ResolutionMap, ImportError> {
        let repo = self.catalog.categories();
        let mut map = ResolutionMap::case_insensitive();

        for category in categories {
            let created = self
                .create(&repo, ImportStage::Categories, category.clone())
                .await?;
            let name = record_label(&created, "name");
            map.insert(&name, created_id(&repo, &created));
            report.record_created(ImportStage::Categories);
            log::info!("Created category: {}", name);
        }

        Ok(map)
    }

    async fn import_subcategories(
        &self,
        subcategories: &[Record],
        categories: &ResolutionMap,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let repo = self.catalog.subcategories();

        for (index, subcategory) in subcategories.iter().enumerate() {
            let label = record_label(subcategory, "name");
            let reference = non_empty_str(subcategory, "categoryId").unwrap_or_default();

            let category_id = match categories.resolve(reference) {
                Resolution::Resolved(id) => id.clone(),
                Resolution::Unresolved => {
                    skip(report, ImportStage::Subcategories, index, label, reference);
                    continue;
                }
            };

            let mut payload = subcategory.clone();
            payload.insert("categoryId".to_string(), Value::String(category_id));
            self.create(&repo, ImportStage::Subcategories, payload)
                .await?;
            report.record_created(ImportStage::Subcategories);
            log::info!("Created subcategory: {}", label);
        }

        Ok(())
    }

    /// Acquisition map: `acquisition_N` -> acquisitionId.
    async fn import_acquisitions(
        &self,
        acquisitions: &[Record],
        report: &mut ImportReport,
    ) -> Result<ResolutionMap, ImportError> {
        let repo = self.catalog.acquisitions();
        let mut map = ResolutionMap::exact();

        for (index, acquisition) in acquisitions.iter().enumerate() {
            let created = self
                .create(&repo, ImportStage::Acquisitions, acquisition.clone())
                .await?;
            map.insert(
                &positional_key("acquisition", index),
                created_id(&repo, &created),
            );
            report.record_created(ImportStage::Acquisitions);
            log::info!(
                "Created acquisition: {}",
                record_label(&created, "sourceOfAcquisition")
            );
        }

        Ok(map)
    }

    /// Object map: `object_N` -> uniqueId. N is the seed position, so skipped
    /// objects leave a gap rather than shifting later keys.
    async fn import_objects(
        &self,
        objects: &[Record],
        acquisitions: &ResolutionMap,
        report: &mut ImportReport,
    ) -> Result<ResolutionMap, ImportError> {
        let repo = self.catalog.objects();
        let mut map = ResolutionMap::exact();

        for (index, object) in objects.iter().enumerate() {
            let label = record_label(object, "nameTitle");
            let reference = non_empty_str(object, "acquisitionId").unwrap_or_default();

            let acquisition_id = match acquisitions.resolve(reference) {
                Resolution::Resolved(id) => id.clone(),
                Resolution::Unresolved => {
                    skip(report, ImportStage::Objects, index, label, reference);
                    continue;
                }
            };

            let mut payload = object.clone();
            payload.insert("acquisitionId".to_string(), Value::String(acquisition_id));
            let created = self.create(&repo, ImportStage::Objects, payload).await?;
            map.insert(&positional_key("object", index), created_id(&repo, &created));
            report.record_created(ImportStage::Objects);
            log::info!("Created object: {}", label);
        }

        Ok(map)
    }

    /// Unresolved object keys are dropped; the grouping is still created.
    async fn import_exhibit_groupings(
        &self,
        groupings: &[Record],
        objects: &ResolutionMap,
        report: &mut ImportReport,
    ) -> Result<(), ImportError> {
        let repo = self.catalog.exhibit_groupings();

        for grouping in groupings {
            let label = record_label(grouping, "name");
            let declared: &[Value] = match grouping.get("objectIds") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            };

            let resolved: Vec<Value> = declared
                .iter()
                .filter_map(|key| key.as_str().and_then(|key| objects.resolve(key).id()))
                .map(|id| Value::String(id.clone()))
                .collect();

            let dropped = declared.len() - resolved.len();
            if dropped > 0 {
                log::warn!(
                    "Exhibit grouping {}: dropped {} unresolved object reference(s)",
                    label,
                    dropped
                );
                report.dropped_object_references += dropped;
            }

            let mut payload = grouping.clone();
            payload.insert("objectIds".to_string(), Value::Array(resolved));
            self.create(&repo, ImportStage::ExhibitGroupings, payload)
                .await?;
            report.record_created(ImportStage::ExhibitGroupings);
            log::info!("Created exhibit grouping: {}", label);
        }

        Ok(())
    }

    async fn create(
        &self,
        repo: &Repository<S>,
        stage: ImportStage,
        payload: Record,
    ) -> Result<Record, ImportError> {
        let label = record_label(&payload, repo.spec().label_field);
        repo.create(payload)
            .await
            .map_err(|source| ImportError::Stage {
                stage,
                label,
                source,
            })
    }
}

fn created_id<S: EntityStore>(repo: &Repository<S>, record: &Record) -> Id {
    non_empty_str(record, repo.spec().id_field)
        .unwrap_or_default()
        .to_string()
}

fn skip(report: &mut ImportReport, stage: ImportStage, index: usize, label: String, reference: &str) {
    let reason = CatalogError::ReferenceUnresolved {
        entity: stage.entity(),
        key: reference.to_string(),
    };
    log::warn!("Skipped {} '{}': {}", stage.entity(), label, reason);
    report.record_skipped(SkippedRecord {
        stage,
        position: index + 1,
        label,
        reference: reference.to_string(),
    });
}

/// Reads a seed document from disk and imports it.
pub async fn import_seed_file<S: EntityStore>(
    catalog: Catalog<S>,
    path: impl AsRef<Path>,
) -> Result<ImportReport, ImportError> {
    let seed = SeedDocument::from_path(path).await?;
    ImportPipeline::new(catalog).run(&seed).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use serde_json::json;
    use std::sync::Arc;

    fn seed(value: serde_json::Value) -> SeedDocument {
        serde_json::from_value(value).unwrap()
    }

    fn catalog() -> Catalog<MemoryStore> {
        Catalog::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn subcategory_category_is_resolved_case_insensitively() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "categories": [{"name": "Pottery"}],
                "subcategories": [{"name": "Vases", "categoryId": "pottery"}]
            })))
            .await
            .unwrap();

        let categories = catalog.categories().list_all().await.unwrap();
        let subcategories = catalog.subcategories().list_all().await.unwrap();
        assert_eq!(subcategories[0]["categoryId"], categories[0]["categoryId"]);
        assert_ne!(subcategories[0]["categoryId"], "pottery");
        assert_eq!(report.created(ImportStage::Subcategories), 1);
    }

    #[tokio::test]
    async fn subcategory_with_unknown_category_is_skipped() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "categories": [{"name": "Pottery"}],
                "subcategories": [
                    {"name": "Tapestries", "categoryId": "textiles"},
                    {"name": "Vases", "categoryId": "Pottery"}
                ]
            })))
            .await
            .unwrap();

        let subcategories = catalog.subcategories().list_all().await.unwrap();
        assert_eq!(subcategories.len(), 1);
        assert_eq!(subcategories[0]["name"], "Vases");
        assert_eq!(catalog.categories().list_all().await.unwrap().len(), 1);

        assert_eq!(report.skipped_in(ImportStage::Subcategories), 1);
        let skipped = &report.skipped[0];
        assert_eq!(skipped.label, "Tapestries");
        assert_eq!(skipped.reference, "textiles");
        assert_eq!(skipped.position, 1);
    }

    #[tokio::test]
    async fn subcategory_without_category_reference_is_skipped() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "categories": [{"name": "Pottery"}],
                "subcategories": [{"name": "Loose"}]
            })))
            .await
            .unwrap();

        assert!(catalog.subcategories().list_all().await.unwrap().is_empty());
        assert_eq!(report.skipped_in(ImportStage::Subcategories), 1);
    }

    #[tokio::test]
    async fn objects_are_linked_to_positional_acquisitions() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "acquisitions": [
                    {"acquisitionDate": "1921-03-04", "sourceOfAcquisition": "Field excavation"},
                    {"acquisitionDate": "1950-11-20", "sourceOfAcquisition": "Private donation"}
                ],
                "objects": [
                    {"nameTitle": "Amphora", "category": "Pottery", "subcategory": "Vases", "acquisitionId": "acquisition_2"},
                    {"nameTitle": "Lost lamp", "category": "Pottery", "subcategory": "Lamps", "acquisitionId": "acquisition_7"}
                ]
            })))
            .await
            .unwrap();

        let acquisitions = catalog.acquisitions().list_all().await.unwrap();
        let objects = catalog.objects().list_all().await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0]["acquisitionId"], acquisitions[1]["acquisitionId"]);
        assert_eq!(report.created(ImportStage::Objects), 1);
        assert_eq!(report.skipped_in(ImportStage::Objects), 1);
    }

    #[tokio::test]
    async fn exhibit_grouping_keeps_only_resolved_objects() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "acquisitions": [{"acquisitionDate": "1921-03-04", "sourceOfAcquisition": "Field excavation"}],
                "objects": [{"nameTitle": "Amphora", "category": "Pottery", "subcategory": "Vases", "acquisitionId": "acquisition_1"}],
                "exhibitGroupings": [{
                    "name": "Greek Pottery",
                    "description": "Vessels from the Aegean",
                    "objectIds": ["object_1", "object_99"]
                }]
            })))
            .await
            .unwrap();

        let object_id = catalog.objects().list_all().await.unwrap()[0]["uniqueId"].clone();
        let groupings = catalog.exhibit_groupings().list_all().await.unwrap();
        assert_eq!(groupings.len(), 1);
        assert_eq!(groupings[0]["objectIds"], json!([object_id]));
        assert_eq!(report.dropped_object_references, 1);
    }

    #[tokio::test]
    async fn object_positions_count_skipped_objects() {
        let catalog = catalog();
        ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "acquisitions": [{"acquisitionDate": "1921", "sourceOfAcquisition": "Dig"}],
                "objects": [
                    {"nameTitle": "Orphan", "category": "c", "subcategory": "s", "acquisitionId": "acquisition_9"},
                    {"nameTitle": "Kept", "category": "c", "subcategory": "s", "acquisitionId": "acquisition_1"}
                ],
                "exhibitGroupings": [
                    {"name": "First", "description": "d", "objectIds": ["object_1"]},
                    {"name": "Second", "description": "d", "objectIds": ["object_2"]}
                ]
            })))
            .await
            .unwrap();

        let kept = catalog.objects().list_all().await.unwrap()[0]["uniqueId"].clone();
        let groupings = catalog.exhibit_groupings().list_all().await.unwrap();
        assert_eq!(groupings[0]["objectIds"], json!([]));
        assert_eq!(groupings[1]["objectIds"], json!([kept]));
    }

    #[tokio::test]
    async fn validation_failure_stops_import_but_keeps_earlier_stages() {
        let catalog = catalog();
        let err = ImportPipeline::new(catalog.clone())
            .run(&seed(json!({
                "categories": [{"name": "Pottery"}],
                "acquisitions": [{"acquisitionDate": "1921-03-04"}],
                "objects": [{"nameTitle": "Amphora", "category": "Pottery", "subcategory": "Vases", "acquisitionId": "acquisition_1"}]
            })))
            .await
            .unwrap_err();

        match err {
            ImportError::Stage { stage, source, .. } => {
                assert_eq!(stage, ImportStage::Acquisitions);
                assert!(source.is_validation());
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(catalog.categories().list_all().await.unwrap().len(), 1);
        assert!(catalog.objects().list_all().await.unwrap().is_empty());
    }

    struct ReadOnlyStore;

    #[async_trait::async_trait]
    impl EntityStore for ReadOnlyStore {
        async fn load(&self, _collection: &str) -> StoreResult<Vec<Record>> {
            Ok(Vec::new())
        }

        async fn save(&self, collection: &str, _records: &[Record]) -> StoreResult<()> {
            Err(StoreError::Io {
                collection: collection.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[tokio::test]
    async fn storage_failure_stops_import() {
        let pipeline = ImportPipeline::new(Catalog::new(Arc::new(ReadOnlyStore)));
        let err = pipeline
            .run(&seed(json!({"categories": [{"name": "Pottery"}]})))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ImportError::Stage {
                stage: ImportStage::Categories,
                source: CatalogError::Storage(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn empty_seed_creates_nothing() {
        let catalog = catalog();
        let report = ImportPipeline::new(catalog.clone())
            .run(&SeedDocument::default())
            .await
            .unwrap();

        assert_eq!(report.total_created(), 0);
        assert!(report.finished_at.is_some());
        assert!(catalog.store().is_empty("categories"));
    }
}
