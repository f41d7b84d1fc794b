use serde::{Deserialize, Serialize};

/// The five catalog collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Category,
    Subcategory,
    Acquisition,
    Object,
    ExhibitGrouping,
}

/// How a repository assigns the identity field on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Use the client-supplied id when it is a non-empty string, otherwise generate one.
    ClientOrGenerated,
    /// Always generate, ignoring any client-supplied value.
    AlwaysGenerated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            kind: FieldKind::Text,
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            kind: FieldKind::Text,
        }
    }

    const fn list(name: &'static str) -> Self {
        Self {
            name,
            required: false,
            kind: FieldKind::TextList,
        }
    }
}

/// Static description of one collection: where it lives, how ids are
/// assigned and which payload fields a create recognizes.
#[derive(Debug, PartialEq, Eq)]
pub struct EntitySpec {
    pub kind: EntityKind,
    /// Display name used in error messages ("Category not found").
    pub display_name: &'static str,
    /// Collection document name in the entity store.
    pub collection: &'static str,
    pub id_field: &'static str,
    pub id_policy: IdPolicy,
    pub fields: &'static [FieldSpec],
    /// Keep payload fields that are not listed in `fields`.
    pub retain_unknown_fields: bool,
    /// Field used to label the record in logs.
    pub label_field: &'static str,
}

impl EntitySpec {
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub static CATEGORY: EntitySpec = EntitySpec {
    kind: EntityKind::Category,
    display_name: "Category",
    collection: "categories",
    id_field: "categoryId",
    id_policy: IdPolicy::ClientOrGenerated,
    fields: &[FieldSpec::required("name")],
    retain_unknown_fields: false,
    label_field: "name",
};

pub static SUBCATEGORY: EntitySpec = EntitySpec {
    kind: EntityKind::Subcategory,
    display_name: "Subcategory",
    collection: "subcategories",
    id_field: "subcategoryId",
    id_policy: IdPolicy::ClientOrGenerated,
    fields: &[FieldSpec::required("name"), FieldSpec::required("categoryId")],
    retain_unknown_fields: false,
    label_field: "name",
};

pub static ACQUISITION: EntitySpec = EntitySpec {
    kind: EntityKind::Acquisition,
    display_name: "Acquisition",
    collection: "acquisitions",
    id_field: "acquisitionId",
    id_policy: IdPolicy::AlwaysGenerated,
    fields: &[
        FieldSpec::required("acquisitionDate"),
        FieldSpec::required("sourceOfAcquisition"),
        FieldSpec::optional("lotDescription"),
        FieldSpec::optional("acquisitionNotes"),
        FieldSpec::optional("conditionUponArrival"),
        FieldSpec::optional("appraisalInformation"),
    ],
    retain_unknown_fields: false,
    label_field: "sourceOfAcquisition",
};

pub static OBJECT: EntitySpec = EntitySpec {
    kind: EntityKind::Object,
    display_name: "Object",
    collection: "objects",
    id_field: "uniqueId",
    id_policy: IdPolicy::AlwaysGenerated,
    fields: &[
        FieldSpec::required("nameTitle"),
        FieldSpec::required("category"),
        FieldSpec::required("subcategory"),
        FieldSpec::optional("acquisitionId"),
    ],
    retain_unknown_fields: true,
    label_field: "nameTitle",
};

pub static EXHIBIT_GROUPING: EntitySpec = EntitySpec {
    kind: EntityKind::ExhibitGrouping,
    display_name: "Exhibit grouping",
    collection: "exhibit-groupings",
    id_field: "groupingId",
    id_policy: IdPolicy::AlwaysGenerated,
    fields: &[
        FieldSpec::required("name"),
        FieldSpec::required("description"),
        FieldSpec::list("objectIds"),
    ],
    retain_unknown_fields: false,
    label_field: "name",
};

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Category,
        EntityKind::Subcategory,
        EntityKind::Acquisition,
        EntityKind::Object,
        EntityKind::ExhibitGrouping,
    ];

    pub fn spec(self) -> &'static EntitySpec {
        match self {
            EntityKind::Category => &CATEGORY,
            EntityKind::Subcategory => &SUBCATEGORY,
            EntityKind::Acquisition => &ACQUISITION,
            EntityKind::Object => &OBJECT,
            EntityKind::ExhibitGrouping => &EXHIBIT_GROUPING,
        }
    }

    /// URL path segment of the collection's route family.
    pub fn route_segment(self) -> &'static str {
        self.spec().collection
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_kind_maps_to_its_own_spec() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
        let collections: HashSet<_> = EntityKind::ALL.iter().map(|k| k.spec().collection).collect();
        assert_eq!(collections.len(), 5);
    }

    #[test]
    fn only_categories_and_subcategories_accept_client_ids() {
        let client: Vec<_> = EntityKind::ALL
            .iter()
            .filter(|k| k.spec().id_policy == IdPolicy::ClientOrGenerated)
            .copied()
            .collect();
        assert_eq!(client, vec![EntityKind::Category, EntityKind::Subcategory]);
    }

    #[test]
    fn required_fields_follow_the_table() {
        let required: Vec<_> = OBJECT.required_fields().collect();
        assert_eq!(required, vec!["nameTitle", "category", "subcategory"]);
        assert_eq!(EXHIBIT_GROUPING.field("objectIds").map(|f| f.kind), Some(FieldKind::TextList));
        assert!(ACQUISITION.field("unknown").is_none());
    }
}
