//! Defines the AST for directory (RFC 4515 style) search filters.

use model::AssertionValue;
use serde::Serialize;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DirectoryFilter {
    /// `(attr=value)`
    Equality { attribute: String, value: String },

    /// `(attr>=value)`
    GreaterOrEqual { attribute: String, value: String },

    /// `(attr<=value)`
    LessOrEqual { attribute: String, value: String },

    /// `(attr~=value)`
    Approximate { attribute: String, value: String },

    /// `(attr=*)`
    Presence { attribute: String },

    /// `(attr=initial*any*…*final)`
    Substring {
        attribute: String,
        initial: Option<String>,
        any: Vec<String>,
        final_: Option<String>,
    },

    And(Vec<DirectoryFilter>),
    Or(Vec<DirectoryFilter>),
    Not(Box<DirectoryFilter>),
}

/// Text form of an assertion value before escaping.
pub fn value_text(value: &AssertionValue) -> String {
    match value {
        AssertionValue::Boolean(v) => String::from(if *v { "TRUE" } else { "FALSE" }),
        AssertionValue::Int(v) => v.to_string(),
        AssertionValue::Long(v) => v.to_string(),
        AssertionValue::String(v) => v.clone(),
    }
}

/// Escapes the characters RFC 4515 reserves inside assertion values.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl fmt::Display for DirectoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryFilter::Equality { attribute, value } => {
                write!(f, "({attribute}={})", escape_value(value))
            }
            DirectoryFilter::GreaterOrEqual { attribute, value } => {
                write!(f, "({attribute}>={})", escape_value(value))
            }
            DirectoryFilter::LessOrEqual { attribute, value } => {
                write!(f, "({attribute}<={})", escape_value(value))
            }
            DirectoryFilter::Approximate { attribute, value } => {
                write!(f, "({attribute}~={})", escape_value(value))
            }
            DirectoryFilter::Presence { attribute } => write!(f, "({attribute}=*)"),
            DirectoryFilter::Substring {
                attribute,
                initial,
                any,
                final_,
            } => {
                write!(f, "({attribute}=")?;
                if let Some(initial) = initial {
                    f.write_str(&escape_value(initial))?;
                }
                f.write_char('*')?;
                // An empty component would render as `**`, which is not a
                // valid substring filter.
                for part in any.iter().filter(|part| !part.is_empty()) {
                    f.write_str(&escape_value(part))?;
                    f.write_char('*')?;
                }
                if let Some(final_) = final_ {
                    f.write_str(&escape_value(final_))?;
                }
                f.write_char(')')
            }
            DirectoryFilter::And(filters) => write_composite(f, '&', filters),
            DirectoryFilter::Or(filters) => write_composite(f, '|', filters),
            DirectoryFilter::Not(filter) => write!(f, "(!{filter})"),
        }
    }
}

fn write_composite(f: &mut fmt::Formatter<'_>, op: char, filters: &[DirectoryFilter]) -> fmt::Result {
    write!(f, "({op}")?;
    for filter in filters {
        write!(f, "{filter}")?;
    }
    f.write_char(')')
}
