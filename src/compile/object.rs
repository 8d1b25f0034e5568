//! Compiled objects, collections and the global data graph.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{CompileError, Result};
use crate::schema::EntityType;

/// Attribute name to value mapping. Keys iterate in sorted order.
pub type Attributes = serde_json::Map<String, Value>;

/// License text emitted under the graph's `_meta` entry.
pub const LICENSE: &str = "The database consisting of this file is made available under \
the Public Domain Dedication and License v1.0 whose full text can be \
found at: http://www.opendatacommons.org/licenses/pddl/1.0/ .";

/// Key of the metadata entry in the serialized graph.
pub const META_KEY: &str = "_meta";

/// One normalized object.
///
/// Serializes as its attribute mapping; the id is the key it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledObject {
    id: String,
    fields: Attributes,
    // Required fields the builder filled with null because the raw object
    // lacked them. Cleared as soon as something assigns the field.
    placeholders: BTreeSet<String>,
}

impl CompiledObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Attributes::new(),
            placeholders: BTreeSet::new(),
        }
    }

    /// Build an object directly from attributes (no placeholders).
    pub fn from_fields(id: impl Into<String>, fields: Attributes) -> Self {
        Self {
            id: id.into(),
            fields,
            placeholders: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Assign a field, replacing any builder placeholder.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.placeholders.remove(&name);
        self.fields.insert(name, value);
    }

    pub(crate) fn set_placeholder(&mut self, name: &str) {
        self.fields.insert(name.to_string(), Value::Null);
        self.placeholders.insert(name.to_string());
    }

    /// Whether `name` holds the null the builder inserted for an absent required field.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.placeholders.contains(name)
    }

    pub fn fields(&self) -> &Attributes {
        &self.fields
    }
}

impl Serialize for CompiledObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// All compiled objects of one entity type, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    objects: BTreeMap<String, CompiledObject>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&CompiledObject> {
        self.objects.get(id)
    }

    pub fn insert(&mut self, object: CompiledObject) {
        self.objects.insert(object.id.clone(), object);
    }

    /// Objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<CompiledObject> for Collection {
    fn from_iter<I: IntoIterator<Item = CompiledObject>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for object in iter {
            collection.insert(object);
        }
        collection
    }
}

/// The compiled output: one collection per entity type, keyed by collection name.
///
/// Collections are append-only. Once committed a collection is never replaced,
/// and callers only ever get shared references to it, so every type compiled
/// later sees it complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataGraph {
    collections: BTreeMap<String, Collection>,
}

impl DataGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fully compiled collection.
    pub fn commit(&mut self, name: impl Into<String>, collection: Collection) -> Result<()> {
        let name = name.into();
        if self.collections.contains_key(&name) {
            return Err(CompileError::CollectionAlreadyCommitted { collection: name });
        }
        self.collections.insert(name, collection);
        Ok(())
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn collection_for(&self, entity: EntityType) -> Option<&Collection> {
        self.collection(&entity.collection_name())
    }

    /// Committed collection names, in sorted order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

#[derive(Serialize)]
struct Meta {
    license: &'static str,
}

impl Serialize for DataGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.collections.len() + 1))?;
        for (name, collection) in &self.collections {
            map.serialize_entry(name, collection)?;
        }
        map.serialize_entry(META_KEY, &Meta { license: LICENSE })?;
        map.end()
    }
}
