//! Channel participants: encode bits into qubits and decode them back.
//!
//! The same [`Participant`] type plays sender, eavesdropper and receiver.
//! Qubits travel by value, so a party that has received a batch owns it and
//! the previous holder can no longer touch it.

use rand::Rng;
use tracing::debug;

use crate::basis::{Basis, Bit, ensure_same_len, validate_bits};
use crate::error::{QkdError, QkdResult};
use crate::qubit::Qubit;

/// A named party on the quantum channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    name: String,
}

impl Participant {
    /// Create a participant. The name only appears in diagnostics.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The participant's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encode `data[i]` as `|data[i]⟩`, rotated by a Hadamard when
    /// `basis[i]` is diagonal.
    pub fn send(&self, data: &[Bit], basis: &[Basis]) -> QkdResult<Vec<Qubit>> {
        ensure_same_len(data.len(), basis.len())?;
        ensure_nonempty(data.len())?;
        validate_bits(data)?;

        let qubits = data
            .iter()
            .zip(basis)
            .map(|(&bit, &b)| {
                let mut qubit = Qubit::from_bit(bit)?;
                if b.is_diagonal() {
                    qubit.hadamard()?;
                }
                Ok(qubit)
            })
            .collect::<QkdResult<Vec<_>>>()?;

        debug!(party = %self.name, qubits = qubits.len(), "encoded qubits");
        Ok(qubits)
    }

    /// Decode qubits using the thread-local RNG for measurement.
    pub fn receive(&self, qubits: Vec<Qubit>, basis: &[Basis]) -> QkdResult<Vec<Bit>> {
        self.receive_with_rng(qubits, basis, &mut rand::thread_rng())
    }

    /// Decode qubits, measuring each in `basis[i]`.
    ///
    /// A diagonal basis applies a Hadamard before the measurement, undoing the
    /// sender's rotation when the bases agree. Fails with
    /// [`QkdError::AlreadyMeasured`](crate::QkdError::AlreadyMeasured) if any
    /// qubit was measured before it arrived.
    pub fn receive_with_rng<R: Rng + ?Sized>(
        &self,
        qubits: Vec<Qubit>,
        basis: &[Basis],
        rng: &mut R,
    ) -> QkdResult<Vec<Bit>> {
        ensure_same_len(qubits.len(), basis.len())?;
        ensure_nonempty(qubits.len())?;

        let mut bits = Vec::with_capacity(qubits.len());
        for (mut qubit, &b) in qubits.into_iter().zip(basis) {
            if b.is_diagonal() {
                qubit.hadamard()?;
            }
            bits.push(qubit.measure_with_rng(rng)?);
        }

        debug!(party = %self.name, bits = bits.len(), "measured qubits");
        Ok(bits)
    }
}

fn ensure_nonempty(count: usize) -> QkdResult<()> {
    if count == 0 {
        return Err(QkdError::InvalidQubitCount(count));
    }
    Ok(())
}
