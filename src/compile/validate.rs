//! Post-construction check of required fields.

use serde_json::Value;

use crate::compile::object::CompiledObject;
use crate::error::{dump, CompileError, Result};
use crate::schema::EntitySchema;

/// Check that every required field of `schema` is present and non-null.
///
/// A required field still holding the builder's placeholder was never supplied
/// and is reported as missing; a null the raw data wrote explicitly is
/// reported as null.
pub fn validate(object: &CompiledObject, schema: &EntitySchema, type_name: &str) -> Result<()> {
    for field in schema.required_fields() {
        let missing = match object.get(&field.name) {
            None => true,
            Some(Value::Null) if object.is_placeholder(&field.name) => true,
            Some(Value::Null) => {
                return Err(CompileError::RequiredFieldNull {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                    dump: dump(object),
                })
            }
            Some(_) => false,
        };

        if missing {
            return Err(CompileError::RequiredFieldMissing {
                type_name: type_name.to_string(),
                field: field.name.clone(),
                dump: dump(object),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::builder::build;
    use crate::compile::object::Attributes;
    use crate::schema::FieldDescriptor;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn schema() -> EntitySchema {
        EntitySchema::new(
            "language",
            vec![
                FieldDescriptor::new("code").required(),
                FieldDescriptor::new("name").required(),
                FieldDescriptor::new("notes"),
            ],
        )
    }

    #[test]
    fn test_complete_object_passes() {
        let obj = build("es", &attrs(json!({"code": "es", "name": "Spanish"})), &schema());
        assert!(validate(&obj, &schema(), "language").is_ok());
    }

    #[test]
    fn test_optional_null_passes() {
        let obj = build(
            "es",
            &attrs(json!({"code": "es", "name": "Spanish", "notes": null})),
            &schema(),
        );
        assert!(validate(&obj, &schema(), "language").is_ok());
    }

    #[test]
    fn test_omitted_required_field_is_missing() {
        let obj = build("es", &attrs(json!({"code": "es"})), &schema());

        let err = validate(&obj, &schema(), "language").unwrap_err();
        match err {
            CompileError::RequiredFieldMissing {
                type_name,
                field,
                dump,
            } => {
                assert_eq!(type_name, "language");
                assert_eq!(field, "name");
                assert!(dump.contains("\"code\": \"es\""));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_field_absent_from_object_is_missing() {
        let obj = CompiledObject::from_fields("es", attrs(json!({"name": "Spanish"})));

        let err = validate(&obj, &schema(), "language").unwrap_err();
        assert!(matches!(err, CompileError::RequiredFieldMissing { ref field, .. } if field == "code"));
    }

    #[test]
    fn test_explicit_null_required_field() {
        let obj = build("es", &attrs(json!({"code": "es", "name": null})), &schema());

        let err = validate(&obj, &schema(), "language").unwrap_err();
        assert!(matches!(err, CompileError::RequiredFieldNull { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_placeholder_filled_later_passes() {
        let mut obj = build("es", &attrs(json!({"code": "es"})), &schema());
        obj.set("name", json!("Spanish"));
        assert!(validate(&obj, &schema(), "language").is_ok());
    }

    #[test]
    fn test_reports_first_field_in_lexical_order() {
        let obj = build("es", &attrs(json!({})), &schema());

        let err = validate(&obj, &schema(), "language").unwrap_err();
        assert!(matches!(err, CompileError::RequiredFieldMissing { ref field, .. } if field == "code"));
    }
}
