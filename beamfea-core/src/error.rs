//! Error types for beam analysis operations.

use thiserror::Error;

/// Result type alias using the library [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline phase during which a numeric failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fill-reducing ordering computed from the nonzero pattern.
    Symbolic,
    /// Numeric LU factorization.
    Factorization,
    /// Back-substitution.
    Solve,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Symbolic => "symbolic analysis",
            Phase::Factorization => "factorization",
            Phase::Solve => "solve",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while building or solving an analysis.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed tabular input: wrong column count, non-numeric token, empty table.
    #[error("input error: {0}")]
    InputShape(String),

    /// A model invariant is broken: index out of range, zero-length element,
    /// normal collinear with the element axis, duplicate BC on one DOF.
    #[error("domain violation: {0}")]
    DomainViolation(String),

    /// Bad configuration: missing member, wrong value type, unreadable file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Singular or otherwise unsolvable system, tagged with the detecting phase.
    #[error("numeric error during {phase}: {detail}")]
    Numeric {
        /// Phase that detected the failure.
        phase: Phase,
        /// Backend diagnostic.
        detail: String,
    },

    /// File could not be opened or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
