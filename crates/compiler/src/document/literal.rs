//! Typed literals and `LIKE` patterns.

use crate::document::ast::{Expr, Literal};
use model::AssertionValue;
use regex::Regex;

/// Wildcard matching any run of characters, including an empty one.
pub const WILDCARD: char = '%';
const SINGLE_CHAR: char = '_';
const ESCAPE: char = '\\';

/// Builds the literal for an assertion value. Numbers stay numbers, so
/// `42` and `"42"` compile to different expressions.
pub fn typed_literal(value: &AssertionValue) -> Expr {
    Expr::Literal(Literal::from(value))
}

/// Concatenates substring components into a `LIKE` pattern:
/// `initial % any₁ % any₂ % … final`.
///
/// Component text is escaped so `%` and `_` typed by the user match
/// literally.
pub fn like_pattern(initial: Option<&str>, any: &[String], final_: Option<&str>) -> String {
    let mut pattern = String::new();
    if let Some(initial) = initial {
        push_escaped(&mut pattern, initial);
    }
    pattern.push(WILDCARD);

    for part in any {
        push_escaped(&mut pattern, part);
        pattern.push(WILDCARD);
    }

    if let Some(final_) = final_ {
        push_escaped(&mut pattern, final_);
    }
    pattern
}

fn push_escaped(pattern: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(c, WILDCARD | SINGLE_CHAR | ESCAPE) {
            pattern.push(ESCAPE);
        }
        pattern.push(c);
    }
}

/// Translates a `LIKE` pattern into an anchored regular expression.
pub fn like_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut source = String::from("(?s)^");
    let mut chars = pattern.chars();
    let mut buf = [0u8; 4];

    while let Some(c) = chars.next() {
        match c {
            WILDCARD => source.push_str(".*"),
            SINGLE_CHAR => source.push('.'),
            ESCAPE => {
                if let Some(escaped) = chars.next() {
                    source.push_str(&regex::escape(escaped.encode_utf8(&mut buf)));
                }
            }
            other => source.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }

    source.push('$');
    Regex::new(&source)
}
