//! Compiler targeting directory servers.
//!
//! The native filter syntax already mirrors the AST, so each node maps to one
//! directory filter. Cardinality is irrelevant here: a directory equality
//! matches any value of a multi-valued attribute.

use crate::{
    backend::Backend,
    compiled::CompiledExpression,
    context::CompileContext,
    error::{CompileError, Result},
};
use model::{Filter, FilterKind};
use tracing::trace;

pub mod ast;

use ast::{DirectoryFilter, value_text};

type Compiled = CompiledExpression<DirectoryFilter>;

#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryBackend;

impl Backend for DirectoryBackend {
    type Expr = DirectoryFilter;

    fn name(&self) -> &'static str {
        "directory"
    }

    fn compile(&self, filter: &Filter, ctx: &CompileContext<'_>) -> Result<Compiled> {
        self.compile_node(filter, ctx, 0)
    }
}

impl DirectoryBackend {
    fn compile_node(&self, filter: &Filter, ctx: &CompileContext<'_>, depth: usize) -> Result<Compiled> {
        let visited = ctx.enter(filter, depth)?;
        let node = visited.node.as_ref();
        let consistency = visited.consistency;
        trace!(kind = %node.kind(), depth, "Compiling filter node");

        let expression = match node {
            Filter::Not { filter } => {
                let child = self.compile_node(filter, ctx, depth + 1)?;
                return Ok(Compiled::new(
                    DirectoryFilter::Not(Box::new(child.expression)),
                    child.consistency,
                ));
            }
            Filter::And { filters } | Filter::Or { filters } => {
                if filters.is_empty() {
                    return Err(CompileError::EmptyComposite { kind: node.kind() });
                }

                let children = filters
                    .iter()
                    .map(|child| self.compile_node(child, ctx, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                let consistency = consistency || children.iter().any(|c| c.consistency);
                let expressions = children
                    .into_iter()
                    .map(CompiledExpression::into_expression)
                    .collect();

                let expression = if node.kind() == FilterKind::And {
                    DirectoryFilter::And(expressions)
                } else {
                    DirectoryFilter::Or(expressions)
                };
                return Ok(Compiled::new(expression, consistency));
            }
            Filter::Equality(assertion) => DirectoryFilter::Equality {
                attribute: ctx.internal_attribute(node)?,
                value: value_text(&assertion.value),
            },
            Filter::GreaterOrEqual(assertion) => DirectoryFilter::GreaterOrEqual {
                attribute: ctx.internal_attribute(node)?,
                value: value_text(&assertion.value),
            },
            Filter::LessOrEqual(assertion) => DirectoryFilter::LessOrEqual {
                attribute: ctx.internal_attribute(node)?,
                value: value_text(&assertion.value),
            },
            Filter::ApproximateMatch(assertion) => DirectoryFilter::Approximate {
                attribute: ctx.internal_attribute(node)?,
                value: value_text(&assertion.value),
            },
            Filter::Presence(_) => DirectoryFilter::Presence {
                attribute: ctx.internal_attribute(node)?,
            },
            Filter::Substring(substring) => DirectoryFilter::Substring {
                attribute: ctx.internal_attribute(node)?,
                initial: substring.initial.clone(),
                any: substring.any.clone(),
                final_: substring.final_.clone(),
            },
            Filter::Lowercase(_) | Filter::Raw { .. } => {
                return Err(CompileError::UnsupportedFilterKind {
                    kind: node.kind(),
                    backend: self.name(),
                });
            }
        };

        Ok(Compiled::new(expression, consistency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{AttributeMetadata, EntitySchema, IdentityResolver, MappedResolver};

    fn schema() -> EntitySchema {
        EntitySchema::new()
            .attribute("mail", AttributeMetadata::multi())
            .attribute("exp", AttributeMetadata::single().with_consistency())
    }

    fn compile(filter: &Filter) -> Result<Compiled> {
        let schema = schema();
        let ctx = CompileContext::new(&schema, &IdentityResolver);
        DirectoryBackend.compile(filter, &ctx)
    }

    #[test]
    fn test_leaves() {
        let cases = [
            (Filter::equality("uid", "alice"), "(uid=alice)"),
            (Filter::equality("mail", "a@x.org"), "(mail=a@x.org)"),
            (Filter::greater_or_equal("exp", 100), "(exp>=100)"),
            (Filter::less_or_equal("exp", 5_000_000_000i64), "(exp<=5000000000)"),
            (Filter::approximate_match("cn", "bob"), "(cn~=bob)"),
            (Filter::presence("uid"), "(uid=*)"),
            (Filter::equality("active", true), "(active=TRUE)"),
            (
                Filter::substring("cn", Some("ab"), &["cd"], Some("ef")),
                "(cn=ab*cd*ef)",
            ),
        ];

        for (filter, expected) in cases {
            assert_eq!(compile(&filter).unwrap().to_string(), expected);
        }
    }

    #[test]
    fn test_values_are_escaped() {
        let filter = Filter::equality("cn", "*)(uid=*");
        assert_eq!(compile(&filter).unwrap().to_string(), r"(cn=\2a\29\28uid=\2a)");
    }

    #[test]
    fn test_or_is_not_rewritten() {
        let filter = Filter::or(vec![Filter::equality("uid", "a"), Filter::equality("uid", "b")]);
        assert_eq!(compile(&filter).unwrap().to_string(), "(|(uid=a)(uid=b))");
    }

    #[test]
    fn test_consistency_propagation() {
        let filter = Filter::and(vec![
            Filter::presence("uid"),
            Filter::or(vec![Filter::presence("mail"), Filter::greater_or_equal("exp", 1)]),
        ]);
        assert!(compile(&filter).unwrap().consistency);

        let filter = Filter::and(vec![Filter::presence("uid"), Filter::presence("mail")]);
        assert!(!compile(&filter).unwrap().consistency);

        let filter = Filter::not(Filter::presence("exp"));
        let compiled = compile(&filter).unwrap();
        assert_eq!(compiled.to_string(), "(!(exp=*))");
        assert!(compiled.consistency);
    }

    #[test]
    fn test_alias_supplies_name() {
        let filter = Filter::equality("", "bob").with_alias(Filter::lowercase("nick"));
        assert_eq!(compile(&filter).unwrap().to_string(), "(nick=bob)");
    }

    #[test]
    fn test_internal_names() {
        let schema = schema();
        let resolver = MappedResolver::default().rename("uid", "uidNumber");
        let ctx = CompileContext::new(&schema, &resolver);
        let compiled = DirectoryBackend
            .compile(&Filter::equality("uid", 7), &ctx)
            .unwrap();
        assert_eq!(compiled.to_string(), "(uidNumber=7)");
    }

    #[test]
    fn test_unsupported_kinds() {
        assert_eq!(
            compile(&Filter::lowercase("uid")).err(),
            Some(CompileError::UnsupportedFilterKind {
                kind: FilterKind::Lowercase,
                backend: "directory",
            })
        );
        assert_eq!(
            compile(&Filter::or(vec![])).err(),
            Some(CompileError::EmptyComposite {
                kind: FilterKind::Or
            })
        );
    }
}
