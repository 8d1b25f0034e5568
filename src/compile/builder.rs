//! Object construction from raw attributes and a field schema.

use serde_json::Value;

use crate::compile::object::{Attributes, CompiledObject};
use crate::schema::EntitySchema;

/// Build a compiled object holding only the fields the schema declares.
///
/// A field is kept if the raw object has it or the schema requires it. A
/// required field the raw object lacks is set to null and remembered as a
/// placeholder, so validation can tell "omitted" from "explicitly null".
/// Attributes the schema doesn't declare are left out; see
/// [`unknown_attributes`].
pub fn build(id: &str, raw: &Attributes, schema: &EntitySchema) -> CompiledObject {
    let mut object = CompiledObject::new(id);

    for field in schema.fields() {
        match raw.get(&field.name) {
            Some(value) => object.set(field.name.clone(), value.clone()),
            None if field.required => object.set_placeholder(&field.name),
            None => {}
        }
    }

    object
}

/// Raw attributes the schema does not account for, in sorted order.
pub fn unknown_attributes<'a>(raw: &'a Attributes, schema: &EntitySchema) -> Vec<&'a str> {
    raw.keys()
        .map(String::as_str)
        .filter(|name| !schema.accepts_attribute(name))
        .collect()
}

/// Whether a raw attribute is present with a non-null value.
pub(crate) fn has_value(raw: &Attributes, name: &str) -> bool {
    !matches!(raw.get(name), None | Some(Value::Null))
}
