//! Error types for the object compilation pipeline.
//!
//! Every variant is fatal: the pipeline never retries and never emits a
//! partially compiled graph. The orchestrator wraps any per-object failure in
//! [`CompileError::Object`] so data-authoring mistakes can be traced back to
//! the offending record.

use std::fmt;

use thiserror::Error;

/// Result type for compilation operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Why a reference could not be resolved against the data graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedCause {
    /// The target collection has not been compiled yet (compile-order bug).
    CollectionNotCompiled,
    /// The target collection exists but holds no object with that id (bad data).
    UnknownId,
}

impl fmt::Display for UnresolvedCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnresolvedCause::CollectionNotCompiled => {
                f.write_str("target collection has not been compiled yet (check the compile order)")
            }
            UnresolvedCause::UnknownId => {
                f.write_str("no object with that id in the target collection (check the data)")
            }
        }
    }
}

/// Errors that can occur while compiling raw collections.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("no field schema for entity type '{type_name}'")]
    SchemaNotFound { type_name: String },

    #[error("key missing: '{field}'\n{dump}")]
    MissingField { field: String, dump: String },

    #[error("field '{field}' should hold {expected}, found: {found}")]
    FieldType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("reference field '{field}' must end with '_id'")]
    InvalidReferenceName { field: String },

    #[error("unresolved reference {field}={id:?} into '{collection}': {cause}")]
    UnresolvedReference {
        field: String,
        collection: String,
        id: String,
        cause: UnresolvedCause,
    },

    #[error("field '{field}' names phrase '{phrase_id}', which is not in the phrase table")]
    UnresolvedPhrase { field: String, phrase_id: String },

    #[error("translations for field '{field}' have no text for default language '{language}'")]
    MissingDefaultTranslation { field: String, language: String },

    #[error("invalid phrase '{phrase_id}': {errors:?}")]
    InvalidPhrase {
        phrase_id: String,
        errors: Vec<String>,
    },

    #[error("missing format key '{key}' with: format_str={format_str:?}, args={args}, kwargs={kwargs}")]
    FormatKey {
        key: String,
        format_str: String,
        args: String,
        kwargs: String,
    },

    #[error("unsupported format spec '{spec}' for field '{field}' in format_str={format_str:?}")]
    FormatSpec {
        field: String,
        spec: String,
        format_str: String,
    },

    #[error("field missing (type_name='{type_name}', field='{field}'):\n{dump}")]
    RequiredFieldMissing {
        type_name: String,
        field: String,
        dump: String,
    },

    #[error("field should not be null (type_name='{type_name}', field='{field}'):\n{dump}")]
    RequiredFieldNull {
        type_name: String,
        field: String,
        dump: String,
    },

    #[error("attribute '{field}' is not declared for type '{type_name}'")]
    UnknownAttribute { type_name: String, field: String },

    #[error("collection '{collection}' has already been committed to the data graph")]
    CollectionAlreadyCommitted { collection: String },

    #[error("while processing '{type_name}' object '{object_id}':\n-->{dump}")]
    Object {
        type_name: String,
        object_id: String,
        dump: String,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Wrap an error raised while compiling one object.
    pub fn in_object(
        self,
        type_name: impl Into<String>,
        object_id: impl Into<String>,
        dump: impl Into<String>,
    ) -> Self {
        CompileError::Object {
            type_name: type_name.into(),
            object_id: object_id.into(),
            dump: dump.into(),
            source: Box::new(self),
        }
    }

    /// The underlying failure with any object-boundary wrappers removed.
    pub fn root_cause(&self) -> &CompileError {
        match self {
            CompileError::Object { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Pretty-print a JSON value for error messages.
pub(crate) fn dump<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}
