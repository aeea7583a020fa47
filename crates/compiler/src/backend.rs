use crate::{compiled::CompiledExpression, context::CompileContext, error::Result};
use model::Filter;
use std::fmt;

/// A target expression language.
///
/// Implementations hold no per-query state: everything a compilation needs
/// arrives through the [`CompileContext`], so one backend value can serve
/// concurrent compilations.
pub trait Backend: Send + Sync {
    type Expr: fmt::Display;

    /// Returns the name of the backend (e.g., "document", "directory").
    fn name(&self) -> &'static str;

    fn compile(
        &self,
        filter: &Filter,
        ctx: &CompileContext<'_>,
    ) -> Result<CompiledExpression<Self::Expr>>;
}
