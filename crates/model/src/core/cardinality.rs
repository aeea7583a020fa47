use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an attribute holds a single value or an array of values.
///
/// `Unknown` is a real answer, not a missing one: a filter node may leave
/// it unset and a schema may not know either, in which case backends have to
/// produce an expression that is valid for both shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Unknown,
    Multi,
    Single,
}

impl Cardinality {
    pub fn is_known(self) -> bool {
        self != Cardinality::Unknown
    }

    pub fn is_multi(self) -> bool {
        self == Cardinality::Multi
    }

    pub fn is_single(self) -> bool {
        self == Cardinality::Single
    }

    /// Returns `self` when known, otherwise `fallback`.
    ///
    /// An explicit marker on a filter node always wins over what the schema
    /// says, so callers write `node.or_else(|| schema)`.
    pub fn or_else(self, fallback: impl FnOnce() -> Cardinality) -> Cardinality {
        match self {
            Cardinality::Unknown => fallback(),
            known => known,
        }
    }
}

impl From<bool> for Cardinality {
    fn from(multi: bool) -> Self {
        if multi {
            Cardinality::Multi
        } else {
            Cardinality::Single
        }
    }
}

impl From<Option<bool>> for Cardinality {
    fn from(multi: Option<bool>) -> Self {
        multi.map_or(Cardinality::Unknown, Cardinality::from)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Unknown => write!(f, "unknown"),
            Cardinality::Multi => write!(f, "multi"),
            Cardinality::Single => write!(f, "single"),
        }
    }
}
