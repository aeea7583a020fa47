use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload-free discriminant of a [`Filter`](super::Filter) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Equality,
    Substring,
    GreaterOrEqual,
    LessOrEqual,
    Presence,
    ApproximateMatch,
    Lowercase,
    Raw,
    And,
    Or,
    Not,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Equality => "EQUALITY",
            FilterKind::Substring => "SUBSTRING",
            FilterKind::GreaterOrEqual => "GREATER_OR_EQUAL",
            FilterKind::LessOrEqual => "LESS_OR_EQUAL",
            FilterKind::Presence => "PRESENCE",
            FilterKind::ApproximateMatch => "APPROXIMATE_MATCH",
            FilterKind::Lowercase => "LOWERCASE",
            FilterKind::Raw => "RAW",
            FilterKind::And => "AND",
            FilterKind::Or => "OR",
            FilterKind::Not => "NOT",
        };
        f.write_str(name)
    }
}
