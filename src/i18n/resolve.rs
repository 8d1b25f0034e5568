//! Attaching phrase-table translations to compiled objects.
//!
//! A translatable field `name` may be accompanied in the raw data by
//! `name_i18n: <phrase id>`. The compiled object then carries the phrase's full
//! per-language map under `name_i18n`, and after customization its plain
//! `name` is replaced by the map's default-language text.

use serde_json::Value;
use tracing::debug;

use crate::compile::builder::has_value;
use crate::compile::object::{Attributes, Collection, CompiledObject};
use crate::error::{dump, CompileError, Result};
use crate::i18n::Language;
use crate::schema::EntitySchema;

/// Suffix of the attribute holding a field's translations.
pub const I18N_SUFFIX: &str = "_i18n";

/// Name of the translation attribute for `field` (e.g. "name" yields "name_i18n").
pub fn i18n_field_name(field: &str) -> String {
    format!("{field}{I18N_SUFFIX}")
}

/// Attach the translations named by `raw[<field>_i18n]`, if any.
///
/// The plain field must be present and non-null in `raw`. Returns whether a
/// translation map was attached; an object without the companion attribute is
/// left untouched.
pub fn attach_translation(
    compiled: &mut CompiledObject,
    raw: &Attributes,
    field: &str,
    phrases: &Collection,
) -> Result<bool> {
    let plain = match raw.get(field) {
        Some(value) if !value.is_null() => value.clone(),
        _ => {
            return Err(CompileError::MissingField {
                field: field.to_string(),
                dump: dump(raw),
            })
        }
    };

    let i18n_field = i18n_field_name(field);
    if !has_value(raw, &i18n_field) {
        return Ok(false);
    }

    let phrase_id = match raw.get(&i18n_field) {
        Some(Value::String(id)) => id.as_str(),
        other => {
            return Err(CompileError::FieldType {
                field: i18n_field,
                expected: "a phrase id string",
                found: other.map_or_else(|| "nothing".to_string(), Value::to_string),
            })
        }
    };

    let phrase = phrases
        .get(phrase_id)
        .ok_or_else(|| CompileError::UnresolvedPhrase {
            field: field.to_string(),
            phrase_id: phrase_id.to_string(),
        })?;

    debug!(field, phrase_id, "attaching translations");
    compiled.set(field, plain);
    compiled.set(i18n_field, Value::Object(phrase.fields().clone()));
    Ok(true)
}

/// Overwrite each translated field's plain value with its `language` text.
pub fn flatten_translations(
    compiled: &mut CompiledObject,
    schema: &EntitySchema,
    language: Language,
) -> Result<()> {
    for field in schema.i18n_fields() {
        let i18n_field = i18n_field_name(&field.name);
        let Some(Value::Object(translations)) = compiled.get(&i18n_field) else {
            continue;
        };

        let text = match translations.get(language.code()) {
            Some(text) if !text.is_null() => text.clone(),
            _ => {
                return Err(CompileError::MissingDefaultTranslation {
                    field: field.name.clone(),
                    language: language.code().to_string(),
                })
            }
        };
        compiled.set(field.name.clone(), text);
    }
    Ok(())
}
