//! Defines the AST for document query (N1QL-style) expressions.

use model::AssertionValue;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A field of the document, or a variable bound by `ANY`, e.g. `mail`.
    Path(String),

    /// A typed literal: string, number or boolean.
    Literal(Literal),

    /// An array literal, e.g. `["a", "b"]`.
    Array(Vec<Literal>),

    /// A binary operation, e.g. `uid = "alice"` or `a AND b`.
    BinaryOp(Box<BinaryOp>),

    /// `NOT expr`
    Not(Box<Expr>),

    /// `expr IS NOT MISSING`
    IsNotMissing(Box<Expr>),

    /// Range predicate over an array:
    /// `ANY variable IN source SATISFIES condition END`.
    Any {
        variable: String,
        source: Box<Expr>,
        satisfies: Box<Expr>,
    },

    /// A function call, e.g. `LOWER(mail)`.
    FunctionCall(FunctionCall),

    /// A parenthesized expression.
    Grouped(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Boolean(bool),
    Number(i64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    // Comparison
    Eq,   // =
    LtEq, // <=
    GtEq, // >=
    Like, // LIKE
    In,   // IN

    // Logical
    And,
    Or,
}

impl Expr {
    pub fn path(name: &str) -> Self {
        Expr::Path(name.to_string())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    pub fn eq(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Eq, right)
    }

    pub fn lte(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::LtEq, right)
    }

    pub fn gte(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::GtEq, right)
    }

    pub fn like(self, pattern: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Like, pattern)
    }

    /// `self IN collection`
    pub fn is_in(self, collection: Expr) -> Self {
        Expr::binary(self, BinaryOperator::In, collection)
    }

    pub fn and(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::And, right)
    }

    pub fn or(self, right: Expr) -> Self {
        Expr::binary(self, BinaryOperator::Or, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn is_not_missing(self) -> Self {
        Expr::IsNotMissing(Box::new(self))
    }

    pub fn grouped(self) -> Self {
        Expr::Grouped(Box::new(self))
    }

    pub fn any(variable: &str, source: Expr, satisfies: Expr) -> Self {
        Expr::Any {
            variable: variable.to_string(),
            source: Box::new(source),
            satisfies: Box::new(satisfies),
        }
    }

    pub fn lower(arg: Expr) -> Self {
        Expr::FunctionCall(FunctionCall {
            name: "LOWER".to_string(),
            args: vec![arg],
        })
    }
}

impl From<&AssertionValue> for Literal {
    fn from(value: &AssertionValue) -> Self {
        match value {
            AssertionValue::Boolean(v) => Literal::Boolean(*v),
            AssertionValue::Int(v) => Literal::Number(i64::from(*v)),
            AssertionValue::Long(v) => Literal::Number(*v),
            AssertionValue::String(v) => Literal::String(v.clone()),
        }
    }
}
