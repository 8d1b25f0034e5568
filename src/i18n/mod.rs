//! Internationalization (i18n) support for the compiled data graph.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the languages phrases are kept in
//! - `language`: Type-safe Language type validated against the registry
//! - `resolve`: Attaching phrase-table translations to compiled objects
//! - `validator`: Phrase table quality validation
//!
//! # Example
//!
//! ```rust,ignore
//! use civic_data::i18n::{attach_translation, flatten_translations, Language};
//!
//! // `name_i18n: p1` in the raw object pulls in phrase `p1`
//! attach_translation(&mut compiled, &raw, "name", &phrases)?;
//! flatten_translations(&mut compiled, schema, Language::canonical())?;
//! ```

mod language;
mod registry;
mod resolve;
mod validator;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolve::{attach_translation, flatten_translations, i18n_field_name, I18N_SUFFIX};
pub use validator::{PhraseValidator, ValidationReport};
