//! Constructors for [`Filter`] trees.

use super::{Assertion, Filter, Lowercase, Presence, SubstringAssertion};
use crate::core::{cardinality::Cardinality, value::AssertionValue};

impl Filter {
    pub fn equality(attribute: &str, value: impl Into<AssertionValue>) -> Self {
        Filter::Equality(Assertion::new(attribute, value))
    }

    pub fn greater_or_equal(attribute: &str, value: impl Into<AssertionValue>) -> Self {
        Filter::GreaterOrEqual(Assertion::new(attribute, value))
    }

    pub fn less_or_equal(attribute: &str, value: impl Into<AssertionValue>) -> Self {
        Filter::LessOrEqual(Assertion::new(attribute, value))
    }

    pub fn approximate_match(attribute: &str, value: impl Into<AssertionValue>) -> Self {
        Filter::ApproximateMatch(Assertion::new(attribute, value))
    }

    pub fn substring(
        attribute: &str,
        initial: Option<&str>,
        any: &[&str],
        final_: Option<&str>,
    ) -> Self {
        Filter::Substring(SubstringAssertion {
            attribute: attribute.to_string(),
            initial: initial.map(str::to_string),
            any: any.iter().map(|s| s.to_string()).collect(),
            final_: final_.map(str::to_string),
            alias: None,
            multi_valued: Cardinality::Unknown,
        })
    }

    pub fn presence(attribute: &str) -> Self {
        Filter::Presence(Presence {
            attribute: attribute.to_string(),
            alias: None,
            multi_valued: Cardinality::Unknown,
        })
    }

    pub fn lowercase(attribute: &str) -> Self {
        Filter::Lowercase(Lowercase {
            attribute: attribute.to_string(),
        })
    }

    pub fn raw(filter: &str) -> Self {
        Filter::Raw {
            filter: filter.to_string(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { filters }
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or { filters }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not {
            filter: Box::new(filter),
        }
    }

    /// Attaches an aliasing child. Ignored on nodes that cannot carry one.
    pub fn with_alias(mut self, alias: Filter) -> Self {
        let slot = match &mut self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => Some(&mut a.alias),
            Filter::Substring(s) => Some(&mut s.alias),
            Filter::Presence(p) => Some(&mut p.alias),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = Some(Box::new(alias));
        }
        self
    }

    /// Sets an explicit cardinality marker, overriding whatever the schema
    /// reports for the attribute.
    pub fn multi_valued(self, multi: bool) -> Self {
        self.with_cardinality(Cardinality::from(multi))
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        match &mut self {
            Filter::Equality(a)
            | Filter::GreaterOrEqual(a)
            | Filter::LessOrEqual(a)
            | Filter::ApproximateMatch(a) => a.multi_valued = cardinality,
            Filter::Substring(s) => s.multi_valued = cardinality,
            Filter::Presence(p) => p.multi_valued = cardinality,
            _ => {}
        }
        self
    }
}

impl Assertion {
    pub fn new(attribute: &str, value: impl Into<AssertionValue>) -> Self {
        Self {
            attribute: attribute.to_string(),
            value: value.into(),
            alias: None,
            multi_valued: Cardinality::Unknown,
        }
    }
}
