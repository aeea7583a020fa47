//! Compiles backend-neutral [`Filter`](model::Filter) trees into the native
//! query expressions of a concrete store.

pub mod backend;
pub mod compiled;
pub mod context;
pub mod directory;
pub mod document;
pub mod error;

pub use backend::Backend;
pub use compiled::CompiledExpression;
pub use context::{CompileContext, CompileOptions};
pub use directory::DirectoryBackend;
pub use document::DocumentBackend;
pub use error::{CompileError, Result};
