//! Resolution of `<type>_id` attributes against already compiled collections.

use serde_json::Value;

use crate::compile::builder::has_value;
use crate::compile::object::{Attributes, CompiledObject, DataGraph};
use crate::error::{dump, CompileError, Result, UnresolvedCause};
use crate::schema::pluralize;

/// Suffix marking an attribute that holds another object's id.
pub const ID_SUFFIX: &str = "_id";

/// Resolve `raw[field]` into the object it names.
///
/// `field` must end with `_id`; the part before it is the referenced type
/// name, whose collection must already be committed to `graph`. Returns the
/// referenced type name together with the object.
pub fn resolve_reference<'g>(
    raw: &Attributes,
    field: &str,
    graph: &'g DataGraph,
) -> Result<(String, &'g CompiledObject)> {
    let type_name = referenced_type_name(field)?;

    let value = raw.get(field).ok_or_else(|| CompileError::MissingField {
        field: field.to_string(),
        dump: dump(raw),
    })?;
    let id = match value {
        Value::String(id) => id.as_str(),
        other => {
            return Err(CompileError::FieldType {
                field: field.to_string(),
                expected: "an object id string",
                found: other.to_string(),
            })
        }
    };

    let collection_name = pluralize(type_name);
    let unresolved = |cause: UnresolvedCause| CompileError::UnresolvedReference {
        field: field.to_string(),
        collection: collection_name.clone(),
        id: id.to_string(),
        cause,
    };

    let collection = graph
        .collection(&collection_name)
        .ok_or_else(|| unresolved(UnresolvedCause::CollectionNotCompiled))?;
    let object = collection
        .get(id)
        .ok_or_else(|| unresolved(UnresolvedCause::UnknownId))?;

    Ok((type_name.to_string(), object))
}

/// Like [`resolve_reference`], but an absent or null reference resolves to `None`.
pub fn resolve_optional_reference<'g>(
    raw: &Attributes,
    field: &str,
    graph: &'g DataGraph,
) -> Result<Option<(String, &'g CompiledObject)>> {
    referenced_type_name(field)?;
    if !has_value(raw, field) {
        return Ok(None);
    }
    resolve_reference(raw, field, graph).map(Some)
}

fn referenced_type_name(field: &str) -> Result<&str> {
    field
        .strip_suffix(ID_SUFFIX)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CompileError::InvalidReferenceName {
            field: field.to_string(),
        })
}
