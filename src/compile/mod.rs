//! The object compilation pipeline.

pub mod builder;
pub mod customize;
pub mod format;
pub mod object;
pub mod pipeline;
pub mod raw;
pub mod reference;
pub mod validate;

pub use builder::{build, unknown_attributes};
pub use customize::customize;
pub use format::easy_format;
pub use object::{Attributes, Collection, CompiledObject, DataGraph, LICENSE, META_KEY};
pub use pipeline::{compile_all, Compilation, Compiler};
pub use raw::{RawCollection, RawCollections};
pub use reference::{resolve_optional_reference, resolve_reference, ID_SUFFIX};
pub use validate::validate;
