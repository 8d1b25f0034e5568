//! The fixed set of entity types and the order they are compiled in.

use std::fmt;

use crate::schema::inflect::{pluralize, singularize};

/// An entity type the pipeline knows how to compile.
///
/// Customization is dispatched on this enum, so adding a type forces every
/// `match` over it to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
    Phrase,
    Area,
    Category,
    DistrictType,
    District,
    ElectionMethod,
    Language,
    Body,
    Office,
}

/// Compile order: every type comes after all types it may reference.
pub const COMPILE_ORDER: [EntityType; 9] = [
    EntityType::Phrase,
    EntityType::Area,
    EntityType::Category,
    EntityType::DistrictType,
    EntityType::District,
    EntityType::ElectionMethod,
    EntityType::Language,
    EntityType::Body,
    EntityType::Office,
];

impl EntityType {
    /// Singular type name used by the field configuration (e.g. "district_type").
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Phrase => "phrase",
            EntityType::Area => "area",
            EntityType::Category => "category",
            EntityType::DistrictType => "district_type",
            EntityType::District => "district",
            EntityType::ElectionMethod => "election_method",
            EntityType::Language => "language",
            EntityType::Body => "body",
            EntityType::Office => "office",
        }
    }

    /// Collection key in the data graph (e.g. "bodies").
    pub fn collection_name(&self) -> String {
        pluralize(self.name())
    }

    /// Look up a type by its singular name.
    pub fn from_name(name: &str) -> Option<EntityType> {
        COMPILE_ORDER.iter().copied().find(|t| t.name() == name)
    }

    /// Look up a type by its collection key.
    pub fn from_collection_name(collection: &str) -> Option<EntityType> {
        singularize(collection).and_then(|name| EntityType::from_name(&name))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
