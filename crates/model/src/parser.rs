//! Capability for turning backend-native filter text into a [`Filter`].
//!
//! Parsing itself lives outside this workspace; callers that accept RAW
//! filters plug in an implementation.

use crate::filter::Filter;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawFilterError {
    #[error("no raw filter parser is configured")]
    Unavailable,

    #[error("invalid filter syntax: {0}")]
    Syntax(String),
}

pub trait RawFilterParser: Send + Sync {
    fn parse(&self, filter: &str) -> Result<Filter, RawFilterError>;
}

/// Rejects every raw filter. Used when the caller does not accept RAW input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRawFilters;

impl RawFilterParser for NoRawFilters {
    fn parse(&self, _filter: &str) -> Result<Filter, RawFilterError> {
        Err(RawFilterError::Unavailable)
    }
}

impl<F> RawFilterParser for F
where
    F: Fn(&str) -> Result<Filter, RawFilterError> + Send + Sync,
{
    fn parse(&self, filter: &str) -> Result<Filter, RawFilterError> {
        self(filter)
    }
}
