//! Error types for instance loading and solving.

use thiserror::Error;

/// Errors that can occur while loading or solving a knapsack instance.
///
/// The variants separate "bad input" ([`Format`](Self::Format),
/// [`InfeasibleInput`](Self::InfeasibleInput)) from "input too large for
/// this solver" ([`ResourceExhausted`](Self::ResourceExhausted)) and from
/// searches that stopped before proving optimality
/// ([`NotCertified`](Self::NotCertified)).
#[derive(Error, Debug)]
pub enum KnapsackError {
    /// Malformed or truncated instance text.
    #[error("format error on line {line}: {message}")]
    Format {
        /// 1-based line number where parsing failed (0 when the whole
        /// input is at fault, e.g. an item count mismatch at end of input).
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// Values that violate the non-negativity of the problem domain.
    #[error("infeasible input: {0}")]
    InfeasibleInput(String),

    /// The instance exceeds a resource ceiling of the chosen strategy.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The search stopped before optimality was proven.
    #[error("solution not certified optimal: {0}")]
    NotCertified(String),

    /// Solver configuration rejected by `validate()`.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Underlying IO failure while reading an instance.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl KnapsackError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        KnapsackError::Format {
            line,
            message: message.into(),
        }
    }

    /// Whether the error is caused by the instance content itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            KnapsackError::Format { .. } | KnapsackError::InfeasibleInput(_)
        )
    }
}

/// Result type for knapsack operations.
pub type Result<T> = std::result::Result<T, KnapsackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let err = KnapsackError::format(3, "expected two numbers");
        assert_eq!(
            err.to_string(),
            "format error on line 3: expected two numbers"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_resource_is_not_input_error() {
        let err = KnapsackError::ResourceExhausted("too many items".into());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: KnapsackError = io.into();
        assert!(matches!(err, KnapsackError::Io(_)));
    }
}
