//! Entity types, collection naming and field schemas.

mod entity;
pub mod inflect;
mod registry;

pub use entity::{EntityType, COMPILE_ORDER};
pub use inflect::{pluralize, singularize};
pub use registry::{EntitySchema, FieldDescriptor, FieldSchemaRegistry};
