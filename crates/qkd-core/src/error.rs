//! Error types for the QKD simulation.

use thiserror::Error;

/// Errors produced by qubit operations, participants and the exchange.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum QkdError {
    /// A gate or measurement was attempted on a collapsed qubit.
    #[error("Qubit already measured")]
    AlreadyMeasured,

    /// Two sequences that must be index-aligned have different lengths.
    #[error("Length mismatch: expected {expected} entries, got {got}")]
    LengthMismatch {
        /// Length of the reference sequence.
        expected: usize,
        /// Length of the offending sequence.
        got: usize,
    },

    /// A classical bit outside {0, 1}.
    #[error("Invalid bit value {value} at index {index}; bits must be 0 or 1")]
    InvalidBit {
        /// Position of the offending entry.
        index: usize,
        /// The value found there.
        value: u8,
    },

    /// A single bit value outside {0, 1}.
    #[error("Invalid bit value {0}; bits must be 0 or 1")]
    InvalidBitValue(u8),

    /// An exchange needs at least one qubit.
    #[error("Qubit count must be at least 1, got {0}")]
    InvalidQubitCount(usize),

    /// A survey needs at least one run.
    #[error("Run count must be at least 1, got {0}")]
    InvalidRunCount(usize),

    /// The XOR cipher cannot cycle an empty key.
    #[error("Key is empty")]
    EmptyKey,

    /// A cipher message may only contain the characters '0' and '1'.
    #[error("Invalid message symbol {symbol:?} at index {index}")]
    InvalidMessageSymbol {
        /// Character position in the message.
        index: usize,
        /// The rejected character.
        symbol: char,
    },

    /// Amplitudes whose squared magnitudes do not sum to one.
    #[error("State is not normalized: norm squared {0}")]
    NotNormalized(f64),

    /// State vectors of different dimension cannot be compared.
    #[error("State dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Dimension of the left-hand state.
        left: usize,
        /// Dimension of the right-hand state.
        right: usize,
    },
}

impl QkdError {
    /// Whether the error stems from malformed caller input rather than
    /// from protocol ordering (double measurement).
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, QkdError::AlreadyMeasured)
    }
}

/// Result type for QKD operations.
pub type QkdResult<T> = Result<T, QkdError>;
