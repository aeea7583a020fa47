//! Renders document expressions into N1QL text.

use crate::document::ast::{BinaryOp, BinaryOperator, Expr, FunctionCall, Literal};
use std::fmt;

/// A trait for any AST node that can be rendered into query text.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// Accumulates the rendered text.
#[derive(Debug, Default)]
pub struct Renderer {
    pub text: String,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the renderer and returns the final text.
    pub fn finish(self) -> String {
        self.text
    }

    /// Wraps an identifier in backticks, doubling any embedded backtick.
    pub fn quote_identifier(&mut self, ident: &str) {
        self.text.push('`');
        self.text.push_str(&ident.replace('`', "``"));
        self.text.push('`');
    }
}

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Path(name) => r.quote_identifier(name),
            Expr::Literal(literal) => literal.render(r),
            Expr::Array(items) => {
                r.text.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        r.text.push_str(", ");
                    }
                    item.render(r);
                }
                r.text.push(']');
            }
            Expr::BinaryOp(op) => op.render(r),
            Expr::Not(expr) => {
                r.text.push_str("NOT ");
                expr.render(r);
            }
            Expr::IsNotMissing(expr) => {
                expr.render(r);
                r.text.push_str(" IS NOT MISSING");
            }
            Expr::Any {
                variable,
                source,
                satisfies,
            } => {
                r.text.push_str("ANY ");
                r.quote_identifier(variable);
                r.text.push_str(" IN ");
                source.render(r);
                r.text.push_str(" SATISFIES ");
                satisfies.render(r);
                r.text.push_str(" END");
            }
            Expr::FunctionCall(func) => func.render(r),
            Expr::Grouped(expr) => {
                r.text.push('(');
                expr.render(r);
                r.text.push(')');
            }
        }
    }
}

impl Render for Literal {
    fn render(&self, r: &mut Renderer) {
        match self {
            Literal::Boolean(v) => r.text.push_str(if *v { "TRUE" } else { "FALSE" }),
            Literal::Number(v) => r.text.push_str(&v.to_string()),
            // JSON string escaping keeps quotes and control characters inside
            // the literal.
            Literal::String(v) => {
                r.text
                    .push_str(&serde_json::Value::String(v.clone()).to_string())
            }
        }
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::Like => " LIKE ",
            BinaryOperator::In => " IN ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.text.push_str(op_str);

        self.right.render(r);
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.text.push_str(&self.name);
        r.text.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                r.text.push_str(", ");
            }
            arg.render(r);
        }
        r.text.push(')');
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::new();
        self.render(&mut renderer);
        f.write_str(&renderer.finish())
    }
}
