//! In-memory evaluation of document expressions against JSON documents.
//!
//! Follows N1QL's missing/null propagation closely enough to check what a
//! compiled filter accepts: a predicate matches only when it evaluates to
//! `TRUE`; `MISSING` and `NULL` both reject.

use crate::document::{
    ast::{BinaryOp, BinaryOperator, Expr, FunctionCall, Literal},
    literal::like_to_regex,
};
use serde_json::Value;
use std::cmp::Ordering;
use tracing::warn;

/// Variables bound by enclosing `ANY` expressions, innermost last.
#[derive(Default)]
struct Scope {
    bindings: Vec<(String, Value)>,
}

impl Scope {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }
}

impl Expr {
    /// Returns `true` when the expression evaluates to `TRUE` for `document`.
    pub fn matches(&self, document: &Value) -> bool {
        let mut scope = Scope::default();
        matches!(evaluate(self, document, &mut scope), Some(Value::Bool(true)))
    }
}

/// `None` stands for `MISSING`.
fn evaluate(expr: &Expr, doc: &Value, scope: &mut Scope) -> Option<Value> {
    match expr {
        Expr::Path(name) => scope
            .lookup(name)
            .or_else(|| doc.get(name.as_str()))
            .cloned(),
        Expr::Literal(literal) => Some(to_json(literal)),
        Expr::Array(items) => Some(Value::Array(items.iter().map(to_json).collect())),
        Expr::BinaryOp(op) => evaluate_binary(op, doc, scope),
        Expr::Not(inner) => match evaluate(inner, doc, scope)? {
            Value::Bool(v) => Some(Value::Bool(!v)),
            _ => Some(Value::Null),
        },
        Expr::IsNotMissing(inner) => Some(Value::Bool(evaluate(inner, doc, scope).is_some())),
        Expr::Any {
            variable,
            source,
            satisfies,
        } => {
            let Some(Value::Array(elements)) = evaluate(source, doc, scope) else {
                return Some(Value::Null);
            };

            for element in elements {
                scope.bindings.push((variable.clone(), element));
                let result = evaluate(satisfies, doc, scope);
                scope.bindings.pop();

                if result == Some(Value::Bool(true)) {
                    return Some(Value::Bool(true));
                }
            }
            Some(Value::Bool(false))
        }
        Expr::FunctionCall(func) => evaluate_function(func, doc, scope),
        Expr::Grouped(inner) => evaluate(inner, doc, scope),
    }
}

fn evaluate_binary(op: &BinaryOp, doc: &Value, scope: &mut Scope) -> Option<Value> {
    match op.op {
        BinaryOperator::And => {
            let left = evaluate(&op.left, doc, scope);
            let right = evaluate(&op.right, doc, scope);
            Some(match (truth(&left), truth(&right)) {
                (Some(false), _) | (_, Some(false)) => Value::Bool(false),
                (Some(true), Some(true)) => Value::Bool(true),
                _ => Value::Null,
            })
        }
        BinaryOperator::Or => {
            let left = evaluate(&op.left, doc, scope);
            let right = evaluate(&op.right, doc, scope);
            Some(match (truth(&left), truth(&right)) {
                (Some(true), _) | (_, Some(true)) => Value::Bool(true),
                (Some(false), Some(false)) => Value::Bool(false),
                _ => Value::Null,
            })
        }
        comparison => {
            let left = evaluate(&op.left, doc, scope)?;
            let right = evaluate(&op.right, doc, scope)?;
            Some(compare(comparison, &left, &right))
        }
    }
}

fn compare(op: BinaryOperator, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOperator::Eq => Value::Bool(json_eq(left, right)),
        BinaryOperator::LtEq => ordering(left, right)
            .map(|o| Value::Bool(o != Ordering::Greater))
            .unwrap_or(Value::Null),
        BinaryOperator::GtEq => ordering(left, right)
            .map(|o| Value::Bool(o != Ordering::Less))
            .unwrap_or(Value::Null),
        BinaryOperator::Like => match (left.as_str(), right.as_str()) {
            (Some(text), Some(pattern)) => match like_to_regex(pattern) {
                Ok(regex) => Value::Bool(regex.is_match(text)),
                Err(err) => {
                    warn!("Invalid LIKE pattern '{}': {}", pattern, err);
                    Value::Null
                }
            },
            _ => Value::Null,
        },
        BinaryOperator::In => match right {
            Value::Array(items) => Value::Bool(items.iter().any(|item| json_eq(left, item))),
            _ => Value::Null,
        },
        BinaryOperator::And | BinaryOperator::Or => Value::Null,
    }
}

fn evaluate_function(func: &FunctionCall, doc: &Value, scope: &mut Scope) -> Option<Value> {
    match func.name.as_str() {
        "LOWER" => {
            let arg = evaluate(func.args.first()?, doc, scope)?;
            Some(
                arg.as_str()
                    .map(|s| Value::String(s.to_lowercase()))
                    .unwrap_or(Value::Null),
            )
        }
        other => {
            warn!("Unknown function in document expression: {}", other);
            Some(Value::Null)
        }
    }
}

fn truth(value: &Option<Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(v)) => Some(*v),
        _ => None,
    }
}

fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => a.as_f64() == b.as_f64(),
        },
        _ => left == right,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
        },
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn to_json(literal: &Literal) -> Value {
    match literal {
        Literal::Boolean(v) => Value::Bool(*v),
        Literal::Number(v) => Value::from(*v),
        Literal::String(v) => Value::String(v.clone()),
    }
}
