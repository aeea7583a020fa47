use serde::Serialize;
use std::fmt;

/// Backend-native rendering of a filter plus whether the query has to wait
/// for index convergence before its result can be trusted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledExpression<E> {
    pub expression: E,
    pub consistency: bool,
}

impl<E> CompiledExpression<E> {
    pub fn new(expression: E, consistency: bool) -> Self {
        Self {
            expression,
            consistency,
        }
    }

    pub fn into_expression(self) -> E {
        self.expression
    }
}

impl<E: fmt::Display> fmt::Display for CompiledExpression<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.expression.fmt(f)
    }
}
