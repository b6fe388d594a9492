//! Error taxonomy shared across the crate.
//!
//! Parsing errors are fatal and all-or-nothing: no partially populated
//! [`Profile`](crate::model::Profile) is ever returned. The `*NotFound`
//! variants are recoverable lookup failures that name the missing entity.

use thiserror::Error;

/// Errors produced by parsing, analysis, and store lookups.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The raw input is not a mapping at the top level.
    #[error("malformed profiler output: {0}")]
    MalformedInput(String),

    /// A required field is present but violates a numeric invariant.
    #[error("invalid value for '{field}': {detail}")]
    Validation { field: String, detail: String },

    /// No structured payload could be isolated from the raw output.
    #[error("could not isolate structured payload: {0}")]
    OutputBoundary(String),

    /// No declared function range matches the requested name.
    #[error("function not found: {0}")]
    FunctionNotFound(String),

    /// No stored profile carries the requested identifier.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),
}

/// Result type for lineprof operations.
pub type Result<T> = std::result::Result<T, ProfileError>;
