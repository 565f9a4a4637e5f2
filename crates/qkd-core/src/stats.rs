//! Key statistics: Shannon entropy and state fidelity.

use num_complex::Complex64;

use crate::basis::Bit;
use crate::error::{QkdError, QkdResult};

/// Shannon entropy in bits of the 0/1 distribution of `bits`.
///
/// `H = -p0·log2(p0) - p1·log2(p1)`, with `0·log2(0) = 0`. An empty key has
/// entropy 0.
pub fn shannon_entropy(bits: &[Bit]) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }

    let len = bits.len() as f64;
    let ones = bits.iter().filter(|&&b| b == 1).count() as f64;
    let zeros = len - ones;

    [zeros / len, ones / len]
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * p.recip().log2())
        .sum()
}

/// Fidelity `|⟨a|b⟩|²` between two pure states.
pub fn fidelity(a: &[Complex64], b: &[Complex64]) -> QkdResult<f64> {
    if a.len() != b.len() {
        return Err(QkdError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let inner: Complex64 = a.iter().zip(b).map(|(x, y)| x.conj() * y).sum();
    Ok(inner.norm_sqr())
}
