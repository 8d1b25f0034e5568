//! Loading raw collections from YAML object files.
//!
//! Each entity type lives in `<collection>.yaml` (e.g. `bodies.yaml`):
//!
//! ```yaml
//! _meta:
//!   base:
//!     partisan: false
//! bodies:
//!   bos:
//!     name: Board of Supervisors
//! ```
//!
//! `_meta` and its `base` mapping are optional. Every type in the compile
//! order must have a file.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;

use crate::compile::{Attributes, RawCollection, RawCollections};
use crate::schema::{EntityType, COMPILE_ORDER};

const META_KEY: &str = "_meta";
const BASE_KEY: &str = "base";

/// Read `<collection>.yaml` for every entity type from `dir`.
pub fn load_raw_collections(dir: &Path) -> Result<RawCollections> {
    let mut collections = RawCollections::new();

    for entity in COMPILE_ORDER {
        let path = dir.join(format!("{}.yaml", entity.collection_name()));
        info!("Reading {}", path.display());

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let collection = parse_raw_collection(entity, &text)
            .with_context(|| format!("Invalid object file {}", path.display()))?;
        collections.insert(entity, collection);
    }

    Ok(collections)
}

/// Parse one object file's YAML text.
pub fn parse_raw_collection(entity: EntityType, yaml: &str) -> Result<RawCollection> {
    let mut document: BTreeMap<String, Value> =
        serde_yaml::from_str(yaml).context("Failed to parse YAML")?;
    let collection_name = entity.collection_name();

    let base = match document.remove(META_KEY) {
        None | Some(Value::Null) => Attributes::new(),
        Some(Value::Object(mut meta)) => match meta.remove(BASE_KEY) {
            None | Some(Value::Null) => Attributes::new(),
            Some(Value::Object(base)) => base,
            Some(other) => bail!("'{}.{}' must be a mapping, found {}", META_KEY, BASE_KEY, other),
        },
        Some(other) => bail!("'{}' must be a mapping, found {}", META_KEY, other),
    };

    let objects = match document.remove(&collection_name) {
        Some(Value::Object(objects)) => objects,
        Some(Value::Null) => Attributes::new(),
        Some(other) => bail!("'{}' must be a mapping, found {}", collection_name, other),
        None => bail!("Missing top-level key '{}'", collection_name),
    };

    let mut collection = RawCollection::new().with_base(base);
    for (id, value) in objects {
        let attributes = match value {
            Value::Object(attributes) => attributes,
            Value::Null => Attributes::new(),
            other => bail!("Object '{}' must be a mapping, found {}", id, other),
        };
        collection = collection.with_object(id, attributes);
    }

    Ok(collection)
}
