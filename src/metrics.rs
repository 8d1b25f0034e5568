//! Compile metrics: counts gathered over one pipeline run.
//!
//! Metrics are owned by the run that produces them (there is no global
//! instance), so two compilations never see each other's counts.

use serde::Serialize;
use std::collections::BTreeMap;

/// Counters for one compilation run.
#[derive(Debug, Clone, Default)]
pub struct CompileMetrics {
    /// Objects compiled, per collection name
    objects: BTreeMap<String, usize>,

    /// Number of translation maps attached to compiled objects
    translations_attached: usize,

    /// Number of raw attributes dropped because no schema declares them
    attributes_dropped: usize,

    /// Number of phrase validation warnings
    phrase_warnings: usize,
}

impl CompileMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one compiled object in `collection`.
    pub fn record_object(&mut self, collection: &str) {
        *self.objects.entry(collection.to_string()).or_insert(0) += 1;
    }

    /// Record a collection with no objects, so it still shows up in the report.
    pub fn record_collection(&mut self, collection: &str) {
        self.objects.entry(collection.to_string()).or_insert(0);
    }

    pub fn record_translation(&mut self) {
        self.translations_attached += 1;
    }

    pub fn record_dropped_attributes(&mut self, count: usize) {
        self.attributes_dropped += count;
    }

    pub fn record_phrase_warnings(&mut self, count: usize) {
        self.phrase_warnings += count;
    }

    pub fn objects_in(&self, collection: &str) -> usize {
        self.objects.get(collection).copied().unwrap_or(0)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            objects: self.objects.clone(),
            total_objects: self.objects.values().sum(),
            translations_attached: self.translations_attached,
            attributes_dropped: self.attributes_dropped,
            phrase_warnings: self.phrase_warnings,
        }
    }
}

/// Metrics report for a finished compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsReport {
    /// Objects compiled, per collection name
    pub objects: BTreeMap<String, usize>,

    /// Objects compiled across all collections
    pub total_objects: usize,

    /// Translation maps attached
    pub translations_attached: usize,

    /// Undeclared raw attributes dropped
    pub attributes_dropped: usize,

    /// Phrase validation warnings
    pub phrase_warnings: usize,
}
