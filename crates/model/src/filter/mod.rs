//! Backend-neutral filter AST.
//!
//! A [`Filter`] is built (or parsed from raw backend text) once per query,
//! handed to a backend compiler, and dropped afterwards. Every node kind has
//! its own payload so backends can match exhaustively instead of probing
//! optional fields.

use crate::core::{cardinality::Cardinality, value::AssertionValue};
use serde::{Deserialize, Serialize};

pub mod builder;
pub mod kind;

pub use kind::FilterKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Filter {
    Equality(Assertion),
    Substring(SubstringAssertion),
    GreaterOrEqual(Assertion),
    LessOrEqual(Assertion),
    Presence(Presence),
    ApproximateMatch(Assertion),
    Lowercase(Lowercase),
    /// Backend-native filter text, parsed into a real node at compile time.
    Raw {
        filter: String,
    },
    And {
        filters: Vec<Filter>,
    },
    Or {
        filters: Vec<Filter>,
    },
    Not {
        filter: Box<Filter>,
    },
}

/// Attribute/value comparison used by EQUALITY, the range kinds and
/// APPROXIMATE_MATCH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    #[serde(default)]
    pub attribute: String,
    pub value: AssertionValue,
    /// Sub-filter supplying an alternate name expression to test instead of
    /// `attribute` (for example a LOWERCASE node).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Box<Filter>>,
    #[serde(default)]
    pub multi_valued: Cardinality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstringAssertion {
    #[serde(default)]
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any: Vec<String>,
    #[serde(rename = "final", default, skip_serializing_if = "Option::is_none")]
    pub final_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Box<Filter>>,
    #[serde(default)]
    pub multi_valued: Cardinality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    #[serde(default)]
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Box<Filter>>,
    #[serde(default)]
    pub multi_valued: Cardinality,
}

/// Case-folding of the attribute *name* itself; used as an aliasing child
/// for case-insensitive comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lowercase {
    pub attribute: String,
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Equality(_) => FilterKind::Equality,
            Filter::Substring(_) => FilterKind::Substring,
            Filter::GreaterOrEqual(_) => FilterKind::GreaterOrEqual,
            Filter::LessOrEqual(_) => FilterKind::LessOrEqual,
            Filter::Presence(_) => FilterKind::Presence,
            Filter::ApproximateMatch(_) => FilterKind::ApproximateMatch,
            Filter::Lowercase(_) => FilterKind::Lowercase,
            Filter::Raw { .. } => FilterKind::Raw,
            Filter::And { .. } => FilterKind::And,
            Filter::Or { .. } => FilterKind::Or,
            Filter::Not { .. } => FilterKind::Not,
        }
    }

    /// The node's own attribute name. `None` for RAW and composite nodes;
    /// leaves may return an empty string when the name comes from the alias.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => Some(&a.attribute),
            Filter::Substring(s) => Some(&s.attribute),
            Filter::Presence(p) => Some(&p.attribute),
            Filter::Lowercase(l) => Some(&l.attribute),
            Filter::Raw { .. } | Filter::And { .. } | Filter::Or { .. } | Filter::Not { .. } => {
                None
            }
        }
    }

    /// Replaces the node's attribute name. No-op for nodes without one.
    pub fn set_attribute_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => a.attribute = name,
            Filter::Substring(s) => s.attribute = name,
            Filter::Presence(p) => p.attribute = name,
            Filter::Lowercase(l) => l.attribute = name,
            Filter::Raw { .. } | Filter::And { .. } | Filter::Or { .. } | Filter::Not { .. } => {}
        }
    }

    pub fn alias(&self) -> Option<&Filter> {
        match self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => a.alias.as_deref(),
            Filter::Substring(s) => s.alias.as_deref(),
            Filter::Presence(p) => p.alias.as_deref(),
            _ => None,
        }
    }

    /// Explicit cardinality marker carried by the node itself.
    pub fn cardinality_marker(&self) -> Cardinality {
        match self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => a.multi_valued,
            Filter::Substring(s) => s.multi_valued,
            Filter::Presence(p) => p.multi_valued,
            _ => Cardinality::Unknown,
        }
    }

    pub fn assertion_value(&self) -> Option<&AssertionValue> {
        match self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => Some(&a.value),
            _ => None,
        }
    }

    /// Direct sub-filters: the operands of a composite, or the aliasing
    /// child of a leaf.
    pub fn children(&self) -> Vec<&Filter> {
        match self {
            Filter::And { filters } | Filter::Or { filters } => filters.iter().collect(),
            Filter::Not { filter } => vec![filter.as_ref()],
            leaf => leaf.alias().into_iter().collect(),
        }
    }

    /// The first non-empty attribute name, looking at the node itself and
    /// then at its children in order.
    pub fn effective_attribute_name(&self) -> Option<&str> {
        if let Some(name) = self.attribute_name().filter(|name| !name.is_empty()) {
            return Some(name);
        }

        self.children()
            .into_iter()
            .filter_map(Filter::attribute_name)
            .find(|name| !name.is_empty())
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Filter::depth)
            .max()
            .unwrap_or(0)
    }
}
