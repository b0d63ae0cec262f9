//! Errors specific to ternary one-time signatures
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enum of error associated with WOTS key derivation, signing and verification
pub enum Error {
    /// This error occurs when a trit buffer does not have the expected width, or
    /// is not a non-zero multiple of it. Carries the length that was supplied.
    #[error("invalid buffer length: {0}")]
    InvalidLength(usize),
    /// Error occurs when the trit at the given position is not in `{-1, 0, 1}`.
    #[error("invalid trit value {1} at position {0}")]
    InvalidTrit(usize, i8),
    /// Error occurs when the tryte value at the given position is not in `[-13, 13]`.
    #[error("invalid tryte value {1} at position {0}")]
    InvalidTryteValue(usize, i8),
    /// Error occurs when a character is not part of the tryte alphabet.
    #[error("invalid tryte character {0:?}")]
    InvalidTryteChar(char),
    /// Error occurs when the security level is outside the supported range.
    #[error("unsupported security level {0}")]
    InvalidSecurityLevel(usize),
    /// Error that occurs when two inputs whose lengths must correlate do not.
    /// The first value is the expected length, the second the supplied one.
    #[error("length mismatch: expected {0}, got {1}")]
    LengthMismatch(usize, usize),
}
