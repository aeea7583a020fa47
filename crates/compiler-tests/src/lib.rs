#![allow(dead_code)]

use compiler::{
    Backend, CompileContext, CompiledExpression, DirectoryBackend, DocumentBackend, Result,
    directory::ast::DirectoryFilter, document::ast::Expr,
};
use model::{
    AttributeMetadata, Cardinality, EntitySchema, Filter, IdentityResolver, RawFilterError,
};

pub mod integration;
pub mod utils;

/// Attributes of a typical client entry.
///
/// `displayName` is deliberately absent so it resolves to unknown
/// cardinality.
pub fn client_schema() -> EntitySchema {
    EntitySchema::new()
        .attribute("inum", AttributeMetadata::single())
        .attribute("clientId", AttributeMetadata::single())
        .attribute("status", AttributeMetadata::single())
        .attribute("redirectUri", AttributeMetadata::multi())
        .attribute("scope", AttributeMetadata::multi().with_consistency())
        .attribute("expiration", AttributeMetadata::single().with_consistency())
        .attribute(
            "nickname",
            AttributeMetadata {
                cardinality: Cardinality::Unknown,
                consistency: true,
            },
        )
}

pub fn compile_document(filter: &Filter) -> Result<CompiledExpression<Expr>> {
    let schema = client_schema();
    let ctx = CompileContext::new(&schema, &IdentityResolver);
    DocumentBackend.compile(filter, &ctx)
}

pub fn compile_directory(filter: &Filter) -> Result<CompiledExpression<DirectoryFilter>> {
    let schema = client_schema();
    let ctx = CompileContext::new(&schema, &IdentityResolver);
    DirectoryBackend.compile(filter, &ctx)
}

/// Parses the single-assertion subset of directory filter text:
/// `(attr=value)` and `(attr=*)`.
pub fn parse_simple_filter(text: &str) -> std::result::Result<Filter, RawFilterError> {
    let body = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| RawFilterError::Syntax(text.to_string()))?;

    match body.split_once('=') {
        Some((attribute, "*")) if !attribute.is_empty() => Ok(Filter::presence(attribute)),
        Some((attribute, value)) if !attribute.is_empty() => {
            Ok(Filter::equality(attribute, value))
        }
        _ => Err(RawFilterError::Syntax(text.to_string())),
    }
}
