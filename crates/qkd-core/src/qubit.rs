//! Single-qubit state simulation.
//!
//! A [`Qubit`] holds the amplitude pair `[a, b]` of `a|0⟩ + b|1⟩` and a
//! measured flag. Gates mutate the amplitudes in place; measurement samples an
//! outcome, collapses the state onto it and locks the qubit against any
//! further operation.
//!
//! # Measurement law
//!
//! The ⟨0|ψ⟩ amplitude is rounded to two decimal places and then squared to
//! give `p0`. A uniform draw `m` in `0..MEASUREMENT_RESOLUTION` selects `0`
//! when `m < p0 · MEASUREMENT_RESOLUTION`, `1` otherwise. The rounding step
//! quantizes the probability: a diagonal-basis state measured in the
//! rectilinear basis yields `0` with probability `0.71² = 0.5041`, not `0.5`.

use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use tracing::trace;

use crate::basis::Bit;
use crate::error::{QkdError, QkdResult};

/// Hadamard gate `1/√2 · [[1, 1], [1, -1]]`.
pub const HADAMARD: [[f64; 2]; 2] = [
    [FRAC_1_SQRT_2, FRAC_1_SQRT_2],
    [FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
];

/// Pauli-X (bit flip) gate `[[0, 1], [1, 0]]`.
pub const PAULI_X: [[f64; 2]; 2] = [[0.0, 1.0], [1.0, 0.0]];

/// Number of equally likely draws a measurement samples from.
pub const MEASUREMENT_RESOLUTION: u32 = 1_000_000;

/// Tolerance used when validating normalization.
const NORM_TOLERANCE: f64 = 1e-9;

const ZERO: Complex64 = Complex64 { re: 0.0, im: 0.0 };
const ONE: Complex64 = Complex64 { re: 1.0, im: 0.0 };

/// A simulated qubit.
///
/// Deliberately not `Clone`: a qubit moves from party to party and is
/// consumed by exactly one measurement.
#[derive(Debug)]
pub struct Qubit {
    /// Amplitudes of `|0⟩` and `|1⟩`.
    amplitudes: [Complex64; 2],
    /// Set by the first measurement; never cleared.
    measured: bool,
}

impl Qubit {
    /// Create a qubit in `|0⟩`.
    pub fn zero() -> Self {
        Self {
            amplitudes: [ONE, ZERO],
            measured: false,
        }
    }

    /// Create a qubit in `|1⟩`.
    pub fn one() -> Self {
        Self {
            amplitudes: [ZERO, ONE],
            measured: false,
        }
    }

    /// Create the computational basis state `|bit⟩`.
    pub fn from_bit(bit: Bit) -> QkdResult<Self> {
        match bit {
            0 => Ok(Self::zero()),
            1 => Ok(Self::one()),
            value => Err(QkdError::InvalidBitValue(value)),
        }
    }

    /// Create a qubit from explicit amplitudes, which must be normalized.
    pub fn from_amplitudes(a: Complex64, b: Complex64) -> QkdResult<Self> {
        let norm_sqr = a.norm_sqr() + b.norm_sqr();
        if (norm_sqr - 1.0).abs() > NORM_TOLERANCE {
            return Err(QkdError::NotNormalized(norm_sqr));
        }
        Ok(Self {
            amplitudes: [a, b],
            measured: false,
        })
    }

    /// Current amplitudes `[a, b]`.
    pub fn amplitudes(&self) -> [Complex64; 2] {
        self.amplitudes
    }

    /// `|a|² + |b|²`, which stays 1 under every operation.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Whether the qubit has already been measured.
    pub fn is_measured(&self) -> bool {
        self.measured
    }

    /// Apply the Hadamard gate.
    pub fn hadamard(&mut self) -> QkdResult<()> {
        self.apply_gate(&HADAMARD)
    }

    /// Apply the Pauli-X gate.
    pub fn pauli_x(&mut self) -> QkdResult<()> {
        self.apply_gate(&PAULI_X)
    }

    fn apply_gate(&mut self, gate: &[[f64; 2]; 2]) -> QkdResult<()> {
        self.ensure_unmeasured()?;
        let [a, b] = self.amplitudes;
        self.amplitudes = [
            a * gate[0][0] + b * gate[0][1],
            a * gate[1][0] + b * gate[1][1],
        ];
        Ok(())
    }

    fn ensure_unmeasured(&self) -> QkdResult<()> {
        if self.measured {
            return Err(QkdError::AlreadyMeasured);
        }
        Ok(())
    }

    /// Probability of collapsing to `0`, after two-decimal rounding of the
    /// ⟨0|ψ⟩ amplitude.
    pub fn zero_probability(&self) -> f64 {
        round_amplitude(self.amplitudes[0]).norm_sqr()
    }

    /// Measure using the thread-local RNG.
    pub fn measure(&mut self) -> QkdResult<Bit> {
        self.measure_with_rng(&mut rand::thread_rng())
    }

    /// Measure, drawing the sample from `rng`.
    pub fn measure_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> QkdResult<Bit> {
        self.ensure_unmeasured()?;
        let draw = rng.gen_range(0..MEASUREMENT_RESOLUTION);
        self.measure_with_draw(draw)
    }

    /// Measure with an explicit draw in `0..MEASUREMENT_RESOLUTION`.
    ///
    /// Draws past the top of the range are clamped to it.
    pub fn measure_with_draw(&mut self, draw: u32) -> QkdResult<Bit> {
        self.ensure_unmeasured()?;
        let draw = draw.min(MEASUREMENT_RESOLUTION - 1);
        let p0 = self.zero_probability();
        let outcome: Bit = if f64::from(draw) < p0 * f64::from(MEASUREMENT_RESOLUTION) {
            0
        } else {
            1
        };

        self.measured = true;
        self.amplitudes = if outcome == 0 { [ONE, ZERO] } else { [ZERO, ONE] };
        trace!(p0, draw, outcome, "qubit measured");
        Ok(outcome)
    }

    /// Human-readable superposition label, e.g. `0.71|0> + -0.71|1>`.
    ///
    /// Amplitudes are rounded to two decimals; zero terms are omitted and a
    /// coefficient of exactly 1 is elided.
    pub fn describe(&self) -> String {
        let mut label = String::new();
        for (index, amplitude) in self.amplitudes.iter().enumerate() {
            let coeff = round_amplitude(*amplitude);
            if coeff == ZERO {
                continue;
            }
            if !label.is_empty() {
                label.push_str(" + ");
            }
            if coeff != ONE {
                label.push_str(&format_coefficient(coeff));
            }
            label.push_str(&format!("|{index}>"));
        }
        label
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn round_to_hundredths(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round_amplitude(c: Complex64) -> Complex64 {
    Complex64::new(round_to_hundredths(c.re), round_to_hundredths(c.im))
}

fn format_coefficient(c: Complex64) -> String {
    if c.im == 0.0 {
        format!("{:?}", c.re)
    } else {
        format!("({c})")
    }
}
