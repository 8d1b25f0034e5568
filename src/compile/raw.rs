//! Raw, loosely-typed input records as supplied by the data source.

use std::collections::BTreeMap;

use crate::compile::object::Attributes;
use crate::schema::EntityType;

/// The raw objects of one entity type plus the collection's `base` defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCollection {
    pub objects: BTreeMap<String, Attributes>,
    /// Attributes every object in the collection starts from.
    pub base: Attributes,
}

impl RawCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: Attributes) -> Self {
        self.base = base;
        self
    }

    pub fn with_object(mut self, id: impl Into<String>, attributes: Attributes) -> Self {
        self.objects.insert(id.into(), attributes);
        self
    }

    /// The object's attributes layered over the collection base.
    pub fn merged(&self, id: &str) -> Option<Attributes> {
        let attributes = self.objects.get(id)?;
        let mut merged = self.base.clone();
        for (name, value) in attributes {
            merged.insert(name.clone(), value.clone());
        }
        Some(merged)
    }
}

/// Raw collections for every entity type that has data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCollections {
    collections: BTreeMap<EntityType, RawCollection>,
}

impl RawCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: EntityType, collection: RawCollection) {
        self.collections.insert(entity, collection);
    }

    pub fn with(mut self, entity: EntityType, collection: RawCollection) -> Self {
        self.insert(entity, collection);
        self
    }

    pub fn get(&self, entity: EntityType) -> Option<&RawCollection> {
        self.collections.get(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_merged_object_overrides_base() {
        let raw = RawCollection::new()
            .with_base(attrs(json!({"partisan": false, "term_length": 4})))
            .with_object("mayor", attrs(json!({"name": "Mayor", "partisan": true})));

        let merged = raw.merged("mayor").unwrap();
        assert_eq!(merged["partisan"], json!(true));
        assert_eq!(merged["term_length"], json!(4));
        assert_eq!(merged["name"], json!("Mayor"));
    }

    #[test]
    fn test_merged_unknown_id() {
        let raw = RawCollection::new();
        assert!(raw.merged("nope").is_none());
    }
}
