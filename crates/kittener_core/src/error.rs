//! Error types for kittener_core.
//!
//! Precondition violations made by the caller (wrong input length, bad
//! genome index) and structural violations rejected by the graph logic.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeatError {
    /// Input vector length differs from the genome's input arity
    #[error("Input arity mismatch: expected {expected} values, got {got}")]
    InputArity { expected: usize, got: usize },

    /// Genome index outside the population
    #[error("Genome index {index} out of range for population of {len}")]
    GenomeIndex { index: usize, len: usize },

    /// Link that would break the layered, duplicate-free graph
    #[error("Rejected link {from} -> {to}: {reason}")]
    BadLink {
        from: usize,
        to: usize,
        reason: &'static str,
    },

    /// Node id not present in the genome
    #[error("Unknown node id {0}")]
    UnknownNode(usize),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, NeatError>;

impl NeatError {
    /// Creates a new rejected-link error.
    #[must_use]
    pub fn bad_link(from: usize, to: usize, reason: &'static str) -> Self {
        Self::BadLink { from, to, reason }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

impl From<anyhow::Error> for NeatError {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NeatError::InputArity {
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "Input arity mismatch: expected 3 values, got 2"
        );
    }

    #[test]
    fn test_bad_link_display() {
        let err = NeatError::bad_link(4, 4, "self loop");
        assert!(err.to_string().contains("self loop"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: NeatError = anyhow::anyhow!("cull fraction").into();
        assert!(matches!(err, NeatError::Config(_)));
    }
}
