//! Classical bits, encoding bases and their random generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QkdError, QkdResult};

/// A classical bit, always 0 or 1.
pub type Bit = u8;

/// Encoding/measurement basis of a single qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    /// Computational basis `{|0⟩, |1⟩}`, encoded as 0.
    Rectilinear,
    /// Hadamard-rotated basis `{|+⟩, |-⟩}`, encoded as 1.
    Diagonal,
}

impl Basis {
    /// Decode the 0/1 basis convention.
    pub fn from_bit(bit: Bit) -> Option<Self> {
        match bit {
            0 => Some(Basis::Rectilinear),
            1 => Some(Basis::Diagonal),
            _ => None,
        }
    }

    /// The 0/1 encoding of this basis.
    pub fn as_bit(self) -> Bit {
        match self {
            Basis::Rectilinear => 0,
            Basis::Diagonal => 1,
        }
    }

    /// Whether preparing/measuring in this basis needs a Hadamard rotation.
    pub fn is_diagonal(self) -> bool {
        self == Basis::Diagonal
    }

    /// Draw a uniformly random basis.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if random_bit(rng) == 0 {
            Basis::Rectilinear
        } else {
            Basis::Diagonal
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Rectilinear => write!(f, "+"),
            Basis::Diagonal => write!(f, "x"),
        }
    }
}

impl TryFrom<Bit> for Basis {
    type Error = QkdError;

    fn try_from(value: Bit) -> QkdResult<Self> {
        Basis::from_bit(value).ok_or(QkdError::InvalidBitValue(value))
    }
}

/// Draw one uniform bit.
pub fn random_bit<R: Rng + ?Sized>(rng: &mut R) -> Bit {
    rng.gen_range(0..=1)
}

/// Draw `n` independent uniform bits.
pub fn random_bits<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Bit> {
    (0..n).map(|_| random_bit(rng)).collect()
}

/// Draw `n` independent uniform bases.
pub fn random_bases<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Basis> {
    (0..n).map(|_| Basis::random(rng)).collect()
}

/// Convert a 0/1 sequence into bases, rejecting anything else.
pub fn bases_from_bits(bits: &[Bit]) -> QkdResult<Vec<Basis>> {
    bits.iter()
        .enumerate()
        .map(|(index, &value)| Basis::from_bit(value).ok_or(QkdError::InvalidBit { index, value }))
        .collect()
}

/// Check that every entry is 0 or 1.
pub fn validate_bits(bits: &[Bit]) -> QkdResult<()> {
    match bits.iter().position(|&b| b > 1) {
        Some(index) => Err(QkdError::InvalidBit {
            index,
            value: bits[index],
        }),
        None => Ok(()),
    }
}

/// Check that two index-aligned sequences have the same length.
pub(crate) fn ensure_same_len(expected: usize, got: usize) -> QkdResult<()> {
    if expected != got {
        return Err(QkdError::LengthMismatch { expected, got });
    }
    Ok(())
}

/// Render a bit string compactly, e.g. `0110`.
pub fn format_bits(bits: &[Bit]) -> String {
    bits.iter().map(|b| char::from(b'0' + b)).collect()
}

/// Render a basis string compactly, e.g. `+xx+`.
pub fn format_bases(bases: &[Basis]) -> String {
    bases.iter().map(ToString::to_string).collect()
}
