//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value violated a documented precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An internal structural invariant failed to hold, e.g. the oracle
    /// returned vertex maps that are not permutations.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The operation is not supported by this system variant.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// The graph-automorphism oracle failed or timed out.
    #[error("oracle failure: {0}")]
    OracleFailure(String),
}
