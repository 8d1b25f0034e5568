//! Per-type customization run after an object is built.
//!
//! Customizers may read any collection already committed to the data graph
//! and may only modify the object being compiled. Types without special
//! handling pass through unchanged.

use serde_json::Value;

use crate::compile::format::easy_format;
use crate::compile::object::{Attributes, CompiledObject, DataGraph};
use crate::compile::reference::{resolve_optional_reference, resolve_reference};
use crate::error::{dump, CompileError, Result};
use crate::schema::EntityType;

/// Apply the customization for `entity` to `compiled`.
pub fn customize(
    entity: EntityType,
    compiled: &mut CompiledObject,
    raw: &Attributes,
    graph: &DataGraph,
) -> Result<()> {
    match entity {
        EntityType::District => customize_district(compiled, raw, graph),
        EntityType::Office => customize_office(compiled, raw, graph),
        EntityType::Phrase
        | EntityType::Area
        | EntityType::Category
        | EntityType::DistrictType
        | EntityType::ElectionMethod
        | EntityType::Language
        | EntityType::Body => Ok(()),
    }
}

/// Fill in `name` and `short_name` from the district type's format strings.
///
/// The raw district's attributes are the format arguments. The district type
/// must carry both `district_name_format` and `district_name_short_format`.
fn customize_district(
    compiled: &mut CompiledObject,
    raw: &Attributes,
    graph: &DataGraph,
) -> Result<()> {
    let (_, district_type) = resolve_reference(raw, "district_type_id", graph)?;

    let name_format = required_str(district_type, "district_name_format")?;
    let name = easy_format(name_format, &[], raw)?;

    let short_format = required_str(district_type, "district_name_short_format")?;
    let short_name = easy_format(short_format, &[], raw)?;

    compiled.set("name", Value::String(name));
    compiled.set("short_name", Value::String(short_name));
    Ok(())
}

/// An office belonging to a body is named after the body's members.
fn customize_office(
    compiled: &mut CompiledObject,
    raw: &Attributes,
    graph: &DataGraph,
) -> Result<()> {
    if let Some((_, body)) = resolve_optional_reference(raw, "body_id", graph)? {
        let member_name = required(body, "member_name")?;
        compiled.set("name", member_name.clone());
    }
    Ok(())
}

fn required<'a>(object: &'a CompiledObject, field: &str) -> Result<&'a Value> {
    match object.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(CompileError::MissingField {
            field: field.to_string(),
            dump: dump(object),
        }),
    }
}

fn required_str<'a>(object: &'a CompiledObject, field: &str) -> Result<&'a str> {
    let value = required(object, field)?;
    value.as_str().ok_or_else(|| CompileError::FieldType {
        field: field.to_string(),
        expected: "a string",
        found: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::object::Collection;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn commit(graph: &mut DataGraph, name: &str, objects: Vec<(&str, Value)>) {
        let collection: Collection = objects
            .into_iter()
            .map(|(id, fields)| CompiledObject::from_fields(id, attrs(fields)))
            .collect();
        graph.commit(name, collection).unwrap();
    }

    fn graph() -> DataGraph {
        let mut graph = DataGraph::new();
        commit(
            &mut graph,
            "district_types",
            vec![
                (
                    "ordinal",
                    json!({
                        "name": "Ordinal",
                        "district_name_format": "{district_code}th District",
                        "district_name_short_format": "{district_code}th",
                    }),
                ),
                (
                    "unabbreviated",
                    json!({"name": "Unabbreviated", "district_name_format": "{district_code}th District"}),
                ),
                (
                    "supervisorial",
                    json!({
                        "name": "Supervisorial",
                        "district_name_format": "Supervisorial District {district_code}",
                        "district_name_short_format": "District {district_code}",
                    }),
                ),
            ],
        );
        commit(
            &mut graph,
            "bodies",
            vec![
                ("bos", json!({"name": "Board of Supervisors", "member_name": "Supervisor"})),
                ("nameless", json!({"name": "Nameless Board"})),
            ],
        );
        graph
    }

    // ==================== District Tests ====================

    #[test]
    fn test_district_name_from_format() {
        let raw = attrs(json!({"district_type_id": "ordinal", "district_code": 5}));
        let mut compiled = CompiledObject::new("d5");

        customize(EntityType::District, &mut compiled, &raw, &graph()).unwrap();

        assert_eq!(compiled.get_str("name"), Some("5th District"));
        assert_eq!(compiled.get_str("short_name"), Some("5th"));
    }

    #[test]
    fn test_district_type_without_short_format() {
        let raw = attrs(json!({"district_type_id": "unabbreviated", "district_code": 5}));
        let mut compiled = CompiledObject::new("d5");

        let err = customize(EntityType::District, &mut compiled, &raw, &graph()).unwrap_err();
        match err {
            CompileError::MissingField { field, dump } => {
                assert_eq!(field, "district_name_short_format");
                assert!(dump.contains("Unabbreviated"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!compiled.contains("name"));
    }

    #[test]
    fn test_district_short_name_format() {
        let raw = attrs(json!({"district_type_id": "supervisorial", "district_code": 11}));
        let mut compiled = CompiledObject::new("sup11");

        customize(EntityType::District, &mut compiled, &raw, &graph()).unwrap();

        assert_eq!(compiled.get_str("name"), Some("Supervisorial District 11"));
        assert_eq!(compiled.get_str("short_name"), Some("District 11"));
    }

    #[test]
    fn test_district_missing_format_key() {
        let raw = attrs(json!({"district_type_id": "ordinal", "code": 5}));
        let mut compiled = CompiledObject::new("d5");

        let err = customize(EntityType::District, &mut compiled, &raw, &graph()).unwrap_err();
        match err {
            CompileError::FormatKey {
                key,
                format_str,
                kwargs,
                ..
            } => {
                assert_eq!(key, "district_code");
                assert_eq!(format_str, "{district_code}th District");
                assert!(kwargs.contains("ordinal"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_district_requires_district_type() {
        let raw = attrs(json!({"district_code": 5}));
        let mut compiled = CompiledObject::new("d5");

        let err = customize(EntityType::District, &mut compiled, &raw, &graph()).unwrap_err();
        assert!(matches!(err, CompileError::MissingField { ref field, .. } if field == "district_type_id"));
    }

    // ==================== Office Tests ====================

    #[test]
    fn test_office_named_after_body_members() {
        let raw = attrs(json!({"body_id": "bos", "name": "Board Seat"}));
        let mut compiled = CompiledObject::from_fields("bos_seat", attrs(json!({"name": "Board Seat"})));

        customize(EntityType::Office, &mut compiled, &raw, &graph()).unwrap();
        assert_eq!(compiled.get_str("name"), Some("Supervisor"));
    }

    #[test]
    fn test_office_without_body_is_unchanged() {
        let raw = attrs(json!({"name": "Mayor"}));
        let mut compiled = CompiledObject::from_fields("mayor", attrs(json!({"name": "Mayor"})));

        customize(EntityType::Office, &mut compiled, &raw, &graph()).unwrap();
        assert_eq!(compiled.get_str("name"), Some("Mayor"));
    }

    #[test]
    fn test_office_body_without_member_name() {
        let raw = attrs(json!({"body_id": "nameless"}));
        let mut compiled = CompiledObject::new("seat");

        let err = customize(EntityType::Office, &mut compiled, &raw, &graph()).unwrap_err();
        assert!(matches!(err, CompileError::MissingField { ref field, .. } if field == "member_name"));
    }

    #[test]
    fn test_office_unknown_body() {
        let raw = attrs(json!({"body_id": "school_board"}));
        let mut compiled = CompiledObject::new("seat");

        let err = customize(EntityType::Office, &mut compiled, &raw, &graph()).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedReference { .. }));
    }

    // ==================== Pass-through Tests ====================

    #[test]
    fn test_other_types_pass_through() {
        let raw = attrs(json!({"name": "Federal"}));
        let mut compiled = CompiledObject::from_fields("federal", raw.clone());
        let before = compiled.clone();

        customize(EntityType::Category, &mut compiled, &raw, &DataGraph::new()).unwrap();
        assert_eq!(compiled, before);
    }
}
