use serde::{Deserialize, Serialize};
use std::fmt;

/// The value a leaf filter asserts against an attribute.
///
/// The set of cases is closed: backends dispatch on it exhaustively when
/// building typed literals, so a number and a numeric-looking string never
/// render the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssertionValue {
    Boolean(bool),
    Int(i32),
    Long(i64),
    String(String),
}

impl fmt::Display for AssertionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionValue::Boolean(v) => write!(f, "{v}"),
            AssertionValue::Int(v) => write!(f, "{v}"),
            AssertionValue::Long(v) => write!(f, "{v}"),
            AssertionValue::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for AssertionValue {
    fn from(v: bool) -> Self {
        AssertionValue::Boolean(v)
    }
}

impl From<i32> for AssertionValue {
    fn from(v: i32) -> Self {
        AssertionValue::Int(v)
    }
}

impl From<i64> for AssertionValue {
    fn from(v: i64) -> Self {
        AssertionValue::Long(v)
    }
}

impl From<&str> for AssertionValue {
    fn from(v: &str) -> Self {
        AssertionValue::String(v.to_string())
    }
}

impl From<String> for AssertionValue {
    fn from(v: String) -> Self {
        AssertionValue::String(v)
    }
}
