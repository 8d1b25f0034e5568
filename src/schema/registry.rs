//! Field schema registry: which attributes each entity type declares.
//!
//! Schemas are read once from static field configuration (YAML) and are
//! immutable afterwards. Field iteration is always in lexical order so that
//! every pass over a schema (building, validating, error reporting) is
//! reproducible.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CompileError;
use crate::i18n::i18n_field_name;
use crate::schema::EntityType;

/// Field configuration shipped with the crate.
const BUILTIN_FIELDS: &str = include_str!("../../data/fields.yaml");

/// Description of one attribute of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// The compiled object must carry a non-null value.
    pub required: bool,
    /// The field may carry a companion `<name>_i18n` phrase reference.
    pub i18n_enabled: bool,
    /// Optional type hint passed through from configuration (e.g. "url").
    pub kind: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            i18n_enabled: false,
            kind: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn i18n(mut self) -> Self {
        self.i18n_enabled = true;
        self
    }
}

/// The set of fields declared for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchema {
    type_name: String,
    fields: BTreeMap<String, FieldDescriptor>,
}

impl EntitySchema {
    /// Create a schema. A later descriptor with the same name replaces an earlier one.
    pub fn new(type_name: impl Into<String>, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All fields, in lexical order of name.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields().filter(|f| f.required)
    }

    pub fn i18n_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields().filter(|f| f.i18n_enabled)
    }

    /// Whether a raw attribute is accounted for by this schema, either as a
    /// declared field or as the translation companion of an i18n field.
    pub fn accepts_attribute(&self, attribute: &str) -> bool {
        self.fields.contains_key(attribute)
            || self.i18n_fields().any(|f| i18n_field_name(&f.name) == attribute)
    }
}

/// Per-type field configuration as it appears in YAML.
#[derive(Debug, Default, Deserialize)]
struct FieldConfig {
    #[serde(default)]
    required: bool,
    #[serde(default, alias = "i18n_okay")]
    i18n_enabled: bool,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldsFile {
    fields: BTreeMap<String, BTreeMap<String, Option<FieldConfig>>>,
}

/// Lookup from entity type name to its schema.
#[derive(Debug, Clone, Default)]
pub struct FieldSchemaRegistry {
    schemas: BTreeMap<String, EntitySchema>,
}

impl FieldSchemaRegistry {
    /// Registry holding the field configuration shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_FIELDS).context("Built-in field configuration is invalid")
    }

    /// Parse a field configuration document of the form
    /// `fields: {<type>: {<field>: {required, i18n_okay, type}}}`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: FieldsFile =
            serde_yaml::from_str(yaml).context("Failed to parse field configuration")?;

        let schemas = file
            .fields
            .into_iter()
            .map(|(type_name, fields)| {
                let descriptors = fields.into_iter().map(|(name, config)| {
                    let config = config.unwrap_or_default();
                    FieldDescriptor {
                        name,
                        required: config.required,
                        i18n_enabled: config.i18n_enabled,
                        kind: config.kind,
                    }
                });
                let schema = EntitySchema::new(type_name.clone(), descriptors);
                (type_name, schema)
            })
            .collect();

        Ok(Self { schemas })
    }

    /// Register (or replace) the schema for its type name.
    pub fn insert(&mut self, schema: EntitySchema) {
        self.schemas.insert(schema.type_name.clone(), schema);
    }

    /// The schema for a type name.
    pub fn fields_for(&self, type_name: &str) -> Result<&EntitySchema, CompileError> {
        self.schemas
            .get(type_name)
            .ok_or_else(|| CompileError::SchemaNotFound {
                type_name: type_name.to_string(),
            })
    }

    pub fn schema(&self, entity: EntityType) -> Result<&EntitySchema, CompileError> {
        self.fields_for(entity.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::COMPILE_ORDER;

    // ==================== Built-in Configuration Tests ====================

    #[test]
    fn test_builtin_covers_every_entity_type() {
        let registry = FieldSchemaRegistry::builtin().expect("Built-in fields should parse");

        for entity in COMPILE_ORDER {
            assert!(
                registry.schema(entity).is_ok(),
                "missing schema for {}",
                entity
            );
        }
    }

    #[test]
    fn test_builtin_district_type_requires_name_format() {
        let registry = FieldSchemaRegistry::builtin().unwrap();
        let schema = registry.fields_for("district_type").unwrap();

        let format = schema.field("district_name_format").unwrap();
        assert!(format.required);
        assert!(!format.i18n_enabled);
        assert!(!schema.field("district_name_short_format").unwrap().required);
    }

    #[test]
    fn test_builtin_kind_hint() {
        let registry = FieldSchemaRegistry::builtin().unwrap();
        let body = registry.fields_for("body").unwrap();
        assert_eq!(body.field("url").unwrap().kind.as_deref(), Some("url"));
        assert_eq!(body.field("notes").unwrap().kind, None);
    }

    // ==================== Parsing Tests ====================

    #[test]
    fn test_from_yaml_str_flags_and_alias() {
        let yaml = r#"
fields:
  area:
    name:
      required: true
      i18n_okay: true
    notes:
    wikipedia:
      type: url
"#;
        let registry = FieldSchemaRegistry::from_yaml_str(yaml).unwrap();
        let area = registry.fields_for("area").unwrap();

        let name = area.field("name").unwrap();
        assert!(name.required);
        assert!(name.i18n_enabled);

        let notes = area.field("notes").unwrap();
        assert!(!notes.required);
        assert!(!notes.i18n_enabled);
    }

    #[test]
    fn test_from_yaml_str_rejects_missing_fields_key() {
        let result = FieldSchemaRegistry::from_yaml_str("area: {}");
        assert!(result.is_err());
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_fields_for_unknown_type() {
        let registry = FieldSchemaRegistry::default();
        let err = registry.fields_for("widget").unwrap_err();
        assert!(matches!(err, CompileError::SchemaNotFound { ref type_name } if type_name == "widget"));
    }

    #[test]
    fn test_fields_iterate_in_lexical_order() {
        let schema = EntitySchema::new(
            "area",
            vec![
                FieldDescriptor::new("zeta"),
                FieldDescriptor::new("alpha").required(),
                FieldDescriptor::new("mid"),
            ],
        );
        let names: Vec<&str> = schema.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_accepts_translation_companion_only_for_i18n_fields() {
        let schema = EntitySchema::new(
            "area",
            vec![
                FieldDescriptor::new("name").required().i18n(),
                FieldDescriptor::new("notes"),
            ],
        );
        assert!(schema.accepts_attribute("name"));
        assert!(schema.accepts_attribute("name_i18n"));
        assert!(schema.accepts_attribute("notes"));
        assert!(!schema.accepts_attribute("notes_i18n"));
        assert!(!schema.accepts_attribute("nmae"));
    }
}
