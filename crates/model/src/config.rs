use crate::schema::{AttributeMetadata, EntitySchema, resolver::MappedResolver};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// On-disk description of an entity's attributes.
///
/// ```json
/// {
///   "attributes": {
///     "mail": { "cardinality": "multi" },
///     "oxAuthExpiration": { "cardinality": "single", "consistency": true }
///   },
///   "internal_names": { "mail": "mail_" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub attributes: HashMap<String, AttributeMetadata>,

    #[serde(default)]
    pub internal_names: HashMap<String, String>,
}

impl SchemaConfig {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn schema(&self) -> EntitySchema {
        EntitySchema {
            attributes: self.attributes.clone(),
        }
    }

    pub fn resolver(&self) -> MappedResolver {
        MappedResolver::new(self.internal_names.clone())
    }
}
