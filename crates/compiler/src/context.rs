//! Per-call collaborators and the node preamble shared by every backend.

use crate::error::{CompileError, Result};
use model::{
    AttributeNameResolver, Filter, RawFilterParser, SchemaMetadataProvider,
    parser::NoRawFilters,
};
use std::borrow::Cow;
use tracing::warn;

/// Default bound on filter nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Callback invoked once per visited node. Instrumentation only.
pub type NodeVisitor<'a> = &'a (dyn Fn(&Filter) + Sync);

/// Everything a compilation reads besides the filter itself.
#[derive(Clone, Copy)]
pub struct CompileContext<'a> {
    schema: &'a dyn SchemaMetadataProvider,
    resolver: &'a dyn AttributeNameResolver,
    raw_parser: &'a dyn RawFilterParser,
    visitor: Option<NodeVisitor<'a>>,
    options: CompileOptions,
}

/// A node ready for dispatch: RAW text already parsed, its own consistency
/// contribution looked up and the visitor notified.
pub(crate) struct Visited<'n> {
    pub node: Cow<'n, Filter>,
    pub consistency: bool,
}

impl<'a> CompileContext<'a> {
    pub fn new(
        schema: &'a dyn SchemaMetadataProvider,
        resolver: &'a dyn AttributeNameResolver,
    ) -> Self {
        Self {
            schema,
            resolver,
            raw_parser: &NoRawFilters,
            visitor: None,
            options: CompileOptions::default(),
        }
    }

    pub fn with_raw_parser(mut self, raw_parser: &'a dyn RawFilterParser) -> Self {
        self.raw_parser = raw_parser;
        self
    }

    pub fn with_visitor(mut self, visitor: NodeVisitor<'a>) -> Self {
        self.visitor = Some(visitor);
        self
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &'a dyn SchemaMetadataProvider {
        self.schema
    }

    /// Runs the steps every backend performs before looking at the node kind.
    ///
    /// `depth` is zero-based; the root is at depth 0.
    pub(crate) fn enter<'n>(&self, node: &'n Filter, depth: usize) -> Result<Visited<'n>> {
        if depth >= self.options.max_depth {
            return Err(CompileError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }

        let node = match node {
            Filter::Raw { filter } => {
                warn!("RAW filter conversion is deprecated and will be removed: {filter}");
                let parsed = self.raw_parser.parse(filter).map_err(|source| {
                    CompileError::RawFilterParse {
                        filter: filter.clone(),
                        source,
                    }
                })?;
                Cow::Owned(parsed)
            }
            other => Cow::Borrowed(other),
        };

        let consistency = node
            .attribute_name()
            .filter(|name| !name.is_empty())
            .is_some_and(|name| self.schema.requires_consistency(name));

        if let Some(visitor) = self.visitor {
            visitor(node.as_ref());
        }

        Ok(Visited { node, consistency })
    }

    /// The storage name of a leaf's attribute. Falls back to the first
    /// child carrying a name when the node's own name is empty.
    pub(crate) fn internal_attribute(&self, node: &Filter) -> Result<String> {
        let logical = node
            .effective_attribute_name()
            .ok_or(CompileError::AttributeResolution { kind: node.kind() })?;

        Ok(self.resolver.resolve(logical).into_owned())
    }

    pub(crate) fn resolve(&self, logical: &str) -> String {
        self.resolver.resolve(logical).into_owned()
    }
}
