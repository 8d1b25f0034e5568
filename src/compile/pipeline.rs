//! Pipeline orchestration: compile every collection in dependency order.
//!
//! Each object goes through build, translation attachment, customization,
//! default-language flattening and validation. A collection is committed to
//! the data graph only once all of its objects compiled, so later types only
//! ever see complete collections. The first failure aborts the whole run.

use tracing::{debug, info, warn};

use crate::compile::builder::{build, has_value, unknown_attributes};
use crate::compile::customize::customize;
use crate::compile::object::{Attributes, Collection, CompiledObject, DataGraph};
use crate::compile::raw::{RawCollection, RawCollections};
use crate::compile::validate::validate;
use crate::error::{dump, CompileError, Result};
use crate::i18n::{
    attach_translation, flatten_translations, i18n_field_name, Language, PhraseValidator,
};
use crate::metrics::{CompileMetrics, MetricsReport};
use crate::schema::{EntitySchema, EntityType, FieldSchemaRegistry, COMPILE_ORDER};

/// Output of a successful run.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub graph: DataGraph,
    pub metrics: MetricsReport,
}

/// Compiles raw collections into a [`DataGraph`].
#[derive(Debug, Clone)]
pub struct Compiler<'a> {
    schemas: &'a FieldSchemaRegistry,
    language: Language,
    strict_attributes: bool,
}

impl<'a> Compiler<'a> {
    pub fn new(schemas: &'a FieldSchemaRegistry) -> Self {
        Self {
            schemas,
            language: Language::canonical(),
            strict_attributes: false,
        }
    }

    /// Treat attributes no schema declares as errors instead of dropping them.
    pub fn strict_attributes(mut self, strict: bool) -> Self {
        self.strict_attributes = strict;
        self
    }

    /// Language whose text replaces the plain value of translated fields.
    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Compile every entity type in [`COMPILE_ORDER`].
    ///
    /// Types with no raw collection compile to an empty collection.
    pub fn compile(&self, raw: &RawCollections) -> Result<Compilation> {
        let mut graph = DataGraph::new();
        let mut metrics = CompileMetrics::new();
        let empty = RawCollection::new();

        for entity in COMPILE_ORDER {
            let raw_collection = raw.get(entity).unwrap_or(&empty);
            let collection = self.compile_collection(entity, raw_collection, &graph, &mut metrics)?;
            graph.commit(entity.collection_name(), collection)?;
        }

        let metrics = metrics.report();
        info!(
            "Compiled {} objects ({} translations attached, {} attributes dropped)",
            metrics.total_objects, metrics.translations_attached, metrics.attributes_dropped
        );
        Ok(Compilation { graph, metrics })
    }

    fn compile_collection(
        &self,
        entity: EntityType,
        raw: &RawCollection,
        graph: &DataGraph,
        metrics: &mut CompileMetrics,
    ) -> Result<Collection> {
        let collection_name = entity.collection_name();
        info!("Compiling collection: {} ({} objects)", collection_name, raw.objects.len());

        let schema = self.schemas.schema(entity)?;
        metrics.record_collection(&collection_name);

        let mut collection = Collection::new();
        // BTreeMap keys: ids are visited in sorted order.
        for id in raw.objects.keys() {
            let attributes = raw.merged(id).unwrap_or_default();
            let object = self
                .compile_object(entity, schema, id, &attributes, graph, metrics)
                .map_err(|e| e.in_object(entity.name(), id.as_str(), dump(&attributes)))?;
            metrics.record_object(&collection_name);
            collection.insert(object);
        }

        if entity == EntityType::Phrase {
            self.check_phrases(raw, metrics)?;
        }
        debug!(
            "Collection {} complete: {} objects",
            collection_name,
            metrics.objects_in(&collection_name)
        );

        Ok(collection)
    }

    fn compile_object(
        &self,
        entity: EntityType,
        schema: &EntitySchema,
        id: &str,
        raw: &Attributes,
        graph: &DataGraph,
        metrics: &mut CompileMetrics,
    ) -> Result<CompiledObject> {
        debug!("Compiling {} '{}'", entity, id);

        let unknown = unknown_attributes(raw, schema);
        if let Some(first) = unknown.first() {
            if self.strict_attributes {
                return Err(CompileError::UnknownAttribute {
                    type_name: entity.name().to_string(),
                    field: (*first).to_string(),
                });
            }
            warn!(
                "Dropping undeclared attributes of {} '{}': {:?}",
                entity, id, unknown
            );
            metrics.record_dropped_attributes(unknown.len());
        }

        let mut object = build(id, raw, schema);

        let no_phrases = Collection::new();
        let phrases = graph
            .collection_for(EntityType::Phrase)
            .unwrap_or(&no_phrases);
        for field in schema.i18n_fields() {
            let wants_translation =
                has_value(raw, &field.name) || has_value(raw, &i18n_field_name(&field.name));
            if wants_translation && attach_translation(&mut object, raw, &field.name, phrases)? {
                metrics.record_translation();
            }
        }

        customize(entity, &mut object, raw, graph)?;
        flatten_translations(&mut object, schema, self.language)?;
        validate(&object, schema, entity.name())?;

        Ok(object)
    }

    fn check_phrases(&self, raw: &RawCollection, metrics: &mut CompileMetrics) -> Result<()> {
        for id in raw.objects.keys() {
            let attributes = raw.merged(id).unwrap_or_default();
            let report = PhraseValidator::validate(&attributes, self.language);
            for warning in &report.warnings {
                warn!("Phrase '{}': {}", id, warning);
            }
            metrics.record_phrase_warnings(report.warnings.len());

            if report.has_errors() {
                return Err(CompileError::InvalidPhrase {
                    phrase_id: id.clone(),
                    errors: report.errors,
                }
                .in_object(EntityType::Phrase.name(), id.as_str(), dump(&attributes)));
            }
        }
        Ok(())
    }
}

/// Compile all raw collections with default settings.
pub fn compile_all(raw: &RawCollections, schemas: &FieldSchemaRegistry) -> Result<DataGraph> {
    Compiler::new(schemas).compile(raw).map(|c| c.graph)
}
