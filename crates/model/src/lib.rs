pub mod config;
pub mod core;
pub mod filter;
pub mod parser;
pub mod schema;

pub use crate::core::{cardinality::Cardinality, value::AssertionValue};
pub use filter::{Filter, FilterKind};
pub use parser::{RawFilterError, RawFilterParser};
pub use schema::{
    AttributeMetadata, EntitySchema, SchemaMetadataProvider,
    resolver::{AttributeNameResolver, IdentityResolver, MappedResolver},
};
