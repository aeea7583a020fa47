//! Compiler targeting document stores with array-typed fields (N1QL-style
//! expressions).
//!
//! Array-valued attributes need different predicates than scalar ones
//! (`ANY … SATISFIES` instead of a direct comparison), so every leaf first
//! settles the attribute's cardinality:
//!
//! 1. an explicit marker on the node,
//! 2. otherwise what the schema reports,
//! 3. otherwise unknown.
//!
//! Unknown-cardinality EQUALITY compiles to a disjunction that holds for
//! either shape. The range, presence and substring kinds only distinguish
//! "definitely multi-valued" from everything else.

use crate::{
    backend::Backend,
    compiled::CompiledExpression,
    context::CompileContext,
    error::{CompileError, Result},
};
use model::{
    AssertionValue, Cardinality, Filter, FilterKind, SchemaMetadataProvider,
    filter::{Assertion, SubstringAssertion},
};
use tracing::{debug, trace};

pub mod ast;
pub mod eval;
pub mod literal;
pub mod render;

use ast::{BinaryOperator, Expr, Literal};
use literal::{like_pattern, typed_literal};

/// Attribute that is stored as a scalar regardless of its declared type.
pub const OBJECT_CLASS: &str = "objectClass";

type Compiled = CompiledExpression<Expr>;

/// Cardinality assumed for `attribute` when a node carries no explicit
/// marker.
pub fn attribute_cardinality(attribute: &str, schema: &dyn SchemaMetadataProvider) -> Cardinality {
    if attribute.eq_ignore_ascii_case(OBJECT_CLASS) {
        Cardinality::Single
    } else {
        schema.cardinality(attribute)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBackend;

impl Backend for DocumentBackend {
    type Expr = Expr;

    fn name(&self) -> &'static str {
        "document"
    }

    fn compile(&self, filter: &Filter, ctx: &CompileContext<'_>) -> Result<Compiled> {
        self.compile_node(filter, ctx, 0)
    }
}

impl DocumentBackend {
    fn compile_node(&self, filter: &Filter, ctx: &CompileContext<'_>, depth: usize) -> Result<Compiled> {
        let visited = ctx.enter(filter, depth)?;
        let node = visited.node.as_ref();
        let consistency = visited.consistency;
        trace!(kind = %node.kind(), depth, "Compiling filter node");

        match node {
            Filter::Not { filter } => {
                let child = self.compile_node(filter, ctx, depth + 1)?;
                // Only the child's flag is forwarded.
                Ok(Compiled::new(
                    child.expression.not().grouped(),
                    child.consistency,
                ))
            }
            Filter::And { filters } => {
                let children = self.compile_all(node.kind(), filters, ctx, depth)?;
                let consistency = consistency || children.iter().any(|c| c.consistency);
                let expression = join(node.kind(), children, BinaryOperator::And)?;
                Ok(Compiled::new(expression.grouped(), consistency))
            }
            Filter::Or { filters } => {
                // Every child is compiled even when the membership rewrite
                // applies; errors in any child still abort.
                let children = self.compile_all(node.kind(), filters, ctx, depth)?;
                let consistency = consistency || children.iter().any(|c| c.consistency);

                if let Some((attribute, values)) = self.membership_candidates(filters, ctx) {
                    let internal = ctx.resolve(attribute);
                    debug!(
                        attribute = %internal,
                        values = values.len(),
                        "Rewriting OR of equalities as IN"
                    );
                    let expression = Expr::path(&internal)
                        .is_in(Expr::Array(values.into_iter().map(Literal::from).collect()))
                        .grouped();
                    return Ok(Compiled::new(expression, consistency));
                }

                let expression = join(node.kind(), children, BinaryOperator::Or)?;
                Ok(Compiled::new(expression.grouped(), consistency))
            }
            Filter::Equality(assertion) => {
                self.compile_equality(node, assertion, consistency, ctx, depth)
            }
            Filter::LessOrEqual(assertion) => {
                let value = typed_literal(&assertion.value);
                let internal = ctx.internal_attribute(node)?;
                let expression =
                    self.on_attribute(node, &internal, ctx, |target| target.lte(value));
                Ok(Compiled::new(expression, consistency))
            }
            Filter::GreaterOrEqual(assertion) => {
                let value = typed_literal(&assertion.value);
                let internal = ctx.internal_attribute(node)?;
                let expression =
                    self.on_attribute(node, &internal, ctx, |target| target.gte(value));
                Ok(Compiled::new(expression, consistency))
            }
            Filter::Presence(_) => {
                let internal = ctx.internal_attribute(node)?;
                let expression =
                    self.on_attribute(node, &internal, ctx, |target| target.is_not_missing());
                Ok(Compiled::new(expression, consistency))
            }
            Filter::Substring(substring) => {
                let pattern = substring_pattern(substring);
                let internal = ctx.internal_attribute(node)?;
                let expression = self.on_attribute(node, &internal, ctx, |target| {
                    target.like(Expr::Literal(Literal::String(pattern)))
                });
                Ok(Compiled::new(expression, consistency))
            }
            // The name is embedded as written, without going through the
            // resolver, so an aliased EQUALITY folds the logical name.
            Filter::Lowercase(lowercase) => {
                if lowercase.attribute.is_empty() {
                    return Err(CompileError::AttributeResolution { kind: node.kind() });
                }
                Ok(Compiled::new(
                    Expr::lower(Expr::path(&lowercase.attribute)),
                    consistency,
                ))
            }
            Filter::ApproximateMatch(_) | Filter::Raw { .. } => {
                Err(CompileError::UnsupportedFilterKind {
                    kind: node.kind(),
                    backend: self.name(),
                })
            }
        }
    }

    fn compile_all(
        &self,
        kind: FilterKind,
        filters: &[Filter],
        ctx: &CompileContext<'_>,
        depth: usize,
    ) -> Result<Vec<Compiled>> {
        if filters.is_empty() {
            return Err(CompileError::EmptyComposite { kind });
        }

        filters
            .iter()
            .map(|filter| self.compile_node(filter, ctx, depth + 1))
            .collect()
    }

    fn compile_equality(
        &self,
        node: &Filter,
        assertion: &Assertion,
        consistency: bool,
        ctx: &CompileContext<'_>,
        depth: usize,
    ) -> Result<Compiled> {
        let cardinality = self.cardinality(node, ctx);
        let internal = ctx.internal_attribute(node)?;
        let value = typed_literal(&assertion.value);

        match (cardinality, assertion.alias.as_deref()) {
            (Cardinality::Multi, Some(alias)) => {
                // The alias tests each element, so it is compiled against the
                // loop variable rather than the attribute.
                let variable = element_variable(&internal);
                let mut per_element = alias.clone();
                per_element.set_attribute_name(variable.as_str());
                let name = self.compile_node(&per_element, ctx, depth + 1)?;

                Ok(Compiled::new(
                    Expr::any(&variable, Expr::path(&internal), name.expression.eq(value)),
                    consistency,
                ))
            }
            (Cardinality::Multi, None) | (Cardinality::Single, None) => Ok(Compiled::new(
                self.on_attribute(node, &internal, ctx, |target| target.eq(value)),
                consistency,
            )),
            (Cardinality::Single, Some(alias)) => {
                let name = self.compile_node(alias, ctx, depth + 1)?;
                Ok(Compiled::new(name.expression.eq(value), consistency))
            }
            (Cardinality::Unknown, Some(alias)) => {
                let name = self.compile_node(alias, ctx, depth + 1)?;
                Ok(Compiled::new(
                    name.expression.eq(value),
                    name.consistency || consistency,
                ))
            }
            (Cardinality::Unknown, None) => {
                debug!(
                    attribute = %internal,
                    "Cardinality unknown, matching both scalar and array shapes"
                );
                let scalar = Expr::path(&internal).eq(value.clone()).grouped();
                let member = value.is_in(Expr::path(&internal)).grouped();
                Ok(Compiled::new(scalar.or(member).grouped(), consistency))
            }
        }
    }

    /// Explicit marker first, then the schema.
    fn cardinality(&self, node: &Filter, ctx: &CompileContext<'_>) -> Cardinality {
        node.cardinality_marker()
            .or_else(|| self.detect_cardinality(node.attribute_name(), ctx))
    }

    fn detect_cardinality(&self, attribute: Option<&str>, ctx: &CompileContext<'_>) -> Cardinality {
        match attribute {
            None | Some("") => Cardinality::Unknown,
            Some(name) => attribute_cardinality(name, ctx.schema()),
        }
    }

    /// Applies `predicate` to the attribute, or to each of its elements when
    /// the attribute is known to be an array.
    fn on_attribute(
        &self,
        node: &Filter,
        internal: &str,
        ctx: &CompileContext<'_>,
        predicate: impl FnOnce(Expr) -> Expr,
    ) -> Expr {
        if self.cardinality(node, ctx).is_multi() {
            let variable = element_variable(internal);
            let satisfies = predicate(Expr::path(&variable));
            Expr::any(&variable, Expr::path(internal), satisfies)
        } else {
            predicate(Expr::path(internal))
        }
    }

    /// Returns the shared attribute and asserted values when every operand of
    /// an OR is a plain EQUALITY on the same single-valued attribute.
    fn membership_candidates<'f>(
        &self,
        filters: &'f [Filter],
        ctx: &CompileContext<'_>,
    ) -> Option<(&'f str, Vec<&'f AssertionValue>)> {
        let mut attribute: Option<&'f str> = None;
        let mut values = Vec::with_capacity(filters.len());

        for filter in filters {
            let Filter::Equality(assertion) = filter else {
                return None;
            };
            if assertion.alias.is_some() || !self.cardinality(filter, ctx).is_single() {
                return None;
            }

            match attribute {
                None => attribute = Some(assertion.attribute.as_str()),
                Some(name) if name != assertion.attribute => return None,
                Some(_) => {}
            }
            values.push(&assertion.value);
        }

        attribute.map(|name| (name, values))
    }
}

/// Name of the `ANY` loop variable ranging over an array attribute.
fn element_variable(internal: &str) -> String {
    format!("{internal}_")
}

fn substring_pattern(substring: &SubstringAssertion) -> String {
    like_pattern(
        substring.initial.as_deref(),
        &substring.any,
        substring.final_.as_deref(),
    )
}

/// Left-associative fold of the children's expressions.
fn join(kind: FilterKind, children: Vec<Compiled>, op: BinaryOperator) -> Result<Expr> {
    children
        .into_iter()
        .map(CompiledExpression::into_expression)
        .reduce(|left, right| Expr::binary(left, op, right))
        .ok_or(CompileError::EmptyComposite { kind })
}
