//! Platform error types

use thiserror::Error;

/// Platform-related errors
///
/// Failing to match any registry entry is not an error: resolution falls
/// back to the default platform. Errors are reserved for registries that
/// cannot be resolved at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The subset/superset declarations form a cycle (or an absurdly deep chain)
    #[error("Platform registry cycle detected at '{name}' (chain deeper than {limit})")]
    RegistryCycle {
        /// Platform being resolved when the limit was hit
        name: String,
        /// The chain depth limit
        limit: usize,
    },

    /// A match expression could not be compiled
    #[error("Invalid platform match pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending expression
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
