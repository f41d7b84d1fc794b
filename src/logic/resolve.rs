use std::collections::HashMap;

use crate::model::Id;

/// How keys of a resolution map are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Exact,
    /// Keys and lookups are lowercased (category names).
    CaseInsensitive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Resolved(&'a Id),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn id(&self) -> Option<&'a Id> {
        match self {
            Resolution::Resolved(id) => Some(*id),
            Resolution::Unresolved => None,
        }
    }
}

/// Maps seed-document reference keys to the ids generated while importing.
#[derive(Debug, Clone)]
pub struct ResolutionMap {
    mode: KeyMode,
    entries: HashMap<String, Id>,
}

impl ResolutionMap {
    pub fn new(mode: KeyMode) -> Self {
        Self {
            mode,
            entries: HashMap::new(),
        }
    }

    pub fn exact() -> Self {
        Self::new(KeyMode::Exact)
    }

    pub fn case_insensitive() -> Self {
        Self::new(KeyMode::CaseInsensitive)
    }

    /// Later inserts under the same key replace earlier ones.
    pub fn insert(&mut self, key: &str, id: Id) {
        let key = self.normalize(key);
        self.entries.insert(key, id);
    }

    pub fn resolve(&self, reference: &str) -> Resolution<'_> {
        match self.entries.get(&self.normalize(reference)) {
            Some(id) => Resolution::Resolved(id),
            None => Resolution::Unresolved,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&self, key: &str) -> String {
        match self.mode {
            KeyMode::Exact => key.to_string(),
            KeyMode::CaseInsensitive => key.to_lowercase(),
        }
    }
}

/// Seed documents refer to acquisitions and objects by 1-indexed position,
/// e.g. `acquisition_3` for the third acquisition.
pub fn positional_key(prefix: &str, index: usize) -> String {
    format!("{}_{}", prefix, index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_lookup_matches_any_casing() {
        let mut map = ResolutionMap::case_insensitive();
        map.insert("Pottery", "cat-1".to_string());

        assert_eq!(map.resolve("pottery").id().map(String::as_str), Some("cat-1"));
        assert_eq!(map.resolve("POTTERY").id().map(String::as_str), Some("cat-1"));
        assert_eq!(map.resolve("textiles"), Resolution::Unresolved);
    }

    #[test]
    fn exact_lookup_is_case_sensitive() {
        let mut map = ResolutionMap::exact();
        map.insert(&positional_key("object", 0), "obj-1".to_string());

        assert_eq!(map.resolve("object_1").id().map(String::as_str), Some("obj-1"));
        assert_eq!(map.resolve("Object_1"), Resolution::Unresolved);
        assert_eq!(map.resolve("object_0"), Resolution::Unresolved);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn positional_keys_are_one_indexed() {
        assert_eq!(positional_key("acquisition", 0), "acquisition_1");
        assert_eq!(positional_key("object", 41), "object_42");
    }
}
