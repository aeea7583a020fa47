use model::{FilterKind, RawFilterError};
use thiserror::Error;

/// Reasons a filter tree could not be compiled. Any error aborts the whole
/// compilation; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{kind} filter is not supported by the {backend} backend")]
    UnsupportedFilterKind {
        kind: FilterKind,
        backend: &'static str,
    },

    #[error("Failed to resolve attribute name of {kind} filter")]
    AttributeResolution { kind: FilterKind },

    #[error("Failed to parse raw filter '{filter}': {source}")]
    RawFilterParse {
        filter: String,
        #[source]
        source: RawFilterError,
    },

    #[error("Filter nesting exceeds maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },

    #[error("{kind} filter requires at least one sub-filter")]
    EmptyComposite { kind: FilterKind },
}

pub type Result<T> = std::result::Result<T, CompileError>;
