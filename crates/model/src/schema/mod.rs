//! Static per-attribute facts used to disambiguate filter translation.

use crate::core::cardinality::Cardinality;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod resolver;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    #[serde(default)]
    pub cardinality: Cardinality,

    /// Searches touching this attribute must wait for index convergence.
    #[serde(default)]
    pub consistency: bool,
}

impl AttributeMetadata {
    pub fn multi() -> Self {
        Self {
            cardinality: Cardinality::Multi,
            consistency: false,
        }
    }

    pub fn single() -> Self {
        Self {
            cardinality: Cardinality::Single,
            consistency: false,
        }
    }

    pub fn with_consistency(mut self) -> Self {
        self.consistency = true;
        self
    }
}

/// Read-only view of attribute metadata, supplied to every compile call.
///
/// A missing entry means "unknown cardinality, no consistency requirement".
pub trait SchemaMetadataProvider: Send + Sync {
    fn lookup(&self, attribute: &str) -> Option<AttributeMetadata>;

    fn cardinality(&self, attribute: &str) -> Cardinality {
        self.lookup(attribute)
            .map(|meta| meta.cardinality)
            .unwrap_or_default()
    }

    fn requires_consistency(&self, attribute: &str) -> bool {
        self.lookup(attribute).is_some_and(|meta| meta.consistency)
    }
}

/// Provider that knows nothing; every attribute is ambiguous.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySchema;

impl SchemaMetadataProvider for EmptySchema {
    fn lookup(&self, _attribute: &str) -> Option<AttributeMetadata> {
        None
    }
}

/// Attribute metadata of one entity definition, keyed by logical name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub attributes: HashMap<String, AttributeMetadata>,
}

impl EntitySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, name: &str, metadata: AttributeMetadata) -> Self {
        self.attributes.insert(name.to_string(), metadata);
        self
    }
}

impl SchemaMetadataProvider for EntitySchema {
    fn lookup(&self, attribute: &str) -> Option<AttributeMetadata> {
        self.attributes.get(attribute).copied()
    }
}

impl SchemaMetadataProvider for HashMap<String, AttributeMetadata> {
    fn lookup(&self, attribute: &str) -> Option<AttributeMetadata> {
        self.get(attribute).copied()
    }
}
