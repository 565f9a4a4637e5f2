//! BB84 exchange orchestration.
//!
//! Algorithm:
//!   1. Sender draws N random bits and N random bases and encodes them.
//!   2. Optionally an eavesdropper measures every qubit in its own random
//!      bases and re-sends what it saw, in those same bases.
//!   3. Receiver measures every arriving qubit in independent random bases.
//!   4. Sifting keeps the positions where sender and receiver bases agree.
//!   5. Entropy of the sender's sifted key and a reference fidelity are
//!      computed.
//!
//! Without interception the two sifted keys are identical. Intercept-resend
//! corrupts about a quarter of the sifted positions, which shows up in
//! [`ExchangeOutcome::error_rate`].

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::basis::{Basis, Bit, ensure_same_len, random_bases, random_bits, validate_bits};
use crate::error::{QkdError, QkdResult};
use crate::participant::Participant;
use crate::qubit::Qubit;
use crate::stats::{fidelity, shannon_entropy};

/// Parameters of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Number of qubits sent over the channel.
    pub qubit_count: usize,
    /// Whether an intercept-resend eavesdropper sits on the channel.
    #[serde(default)]
    pub eavesdropper: bool,
}

impl ExchangeConfig {
    /// An exchange of `qubit_count` qubits over an untapped channel.
    pub fn new(qubit_count: usize) -> Self {
        Self {
            qubit_count,
            eavesdropper: false,
        }
    }

    /// Place (or remove) an eavesdropper on the channel.
    #[must_use]
    pub fn with_eavesdropper(mut self, present: bool) -> Self {
        self.eavesdropper = present;
        self
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> QkdResult<()> {
        if self.qubit_count == 0 {
            return Err(QkdError::InvalidQubitCount(0));
        }
        Ok(())
    }
}

/// Every random choice an exchange depends on, apart from measurement draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeChoices {
    /// Bits the sender encodes.
    pub sender_bits: Vec<Bit>,
    /// Bases the sender encodes in.
    pub sender_bases: Vec<Basis>,
    /// Bases the eavesdropper measures and re-sends in, if present.
    pub eavesdropper_bases: Option<Vec<Basis>>,
    /// Bases the receiver measures in.
    pub receiver_bases: Vec<Basis>,
}

impl ExchangeChoices {
    /// Draw fresh uniform choices for `config`.
    pub fn random<R: Rng + ?Sized>(config: &ExchangeConfig, rng: &mut R) -> QkdResult<Self> {
        config.validate()?;
        let n = config.qubit_count;

        let sender_bases = random_bases(n, rng);
        let sender_bits = random_bits(n, rng);
        let eavesdropper_bases = config.eavesdropper.then(|| random_bases(n, rng));
        let receiver_bases = random_bases(n, rng);

        Ok(Self {
            sender_bits,
            sender_bases,
            eavesdropper_bases,
            receiver_bases,
        })
    }

    /// Number of qubits these choices cover.
    pub fn len(&self) -> usize {
        self.sender_bits.len()
    }

    /// Whether no qubits are covered.
    pub fn is_empty(&self) -> bool {
        self.sender_bits.is_empty()
    }

    /// Check lengths and bit values.
    pub fn validate(&self) -> QkdResult<()> {
        let n = self.len();
        if n == 0 {
            return Err(QkdError::InvalidQubitCount(0));
        }
        validate_bits(&self.sender_bits)?;
        ensure_same_len(n, self.sender_bases.len())?;
        ensure_same_len(n, self.receiver_bases.len())?;
        if let Some(bases) = &self.eavesdropper_bases {
            ensure_same_len(n, bases.len())?;
        }
        Ok(())
    }

    /// Run the exchange these choices describe.
    pub fn execute_with_rng<R: Rng + ?Sized>(self, rng: &mut R) -> QkdResult<ExchangeOutcome> {
        self.validate()?;

        let sender = Participant::new("Alice");
        let receiver = Participant::new("Bob");

        let mut channel = sender.send(&self.sender_bits, &self.sender_bases)?;

        let intercepted_bits = match &self.eavesdropper_bases {
            Some(bases) => {
                let eavesdropper = Participant::new("Eve");
                let bits = eavesdropper.receive_with_rng(channel, bases, rng)?;
                channel = eavesdropper.send(&bits, bases)?;
                debug!(intercepted = bits.len(), "channel intercepted and re-sent");
                Some(bits)
            }
            None => None,
        };

        let receiver_bits = receiver.receive_with_rng(channel, &self.receiver_bases, rng)?;

        let sifted_indices = sift(&self.sender_bases, &self.receiver_bases)?;
        let sender_key: Vec<Bit> = sifted_indices.iter().map(|&i| self.sender_bits[i]).collect();
        let receiver_key: Vec<Bit> = sifted_indices.iter().map(|&i| receiver_bits[i]).collect();

        let entropy = shannon_entropy(&sender_key);
        let fidelity = reference_fidelity()?;

        debug!(
            qubits = self.len(),
            sifted = sifted_indices.len(),
            entropy,
            "exchange complete"
        );

        Ok(ExchangeOutcome {
            sender_key,
            receiver_key,
            entropy,
            fidelity,
            transcript: ExchangeTranscript {
                sender_bits: self.sender_bits,
                sender_bases: self.sender_bases,
                eavesdropper_bases: self.eavesdropper_bases,
                intercepted_bits,
                receiver_bases: self.receiver_bases,
                receiver_bits,
                sifted_indices,
            },
        })
    }
}

/// Everything that happened during an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeTranscript {
    pub sender_bits: Vec<Bit>,
    pub sender_bases: Vec<Basis>,
    pub eavesdropper_bases: Option<Vec<Basis>>,
    /// What the eavesdropper measured, if present.
    pub intercepted_bits: Option<Vec<Bit>>,
    pub receiver_bases: Vec<Basis>,
    pub receiver_bits: Vec<Bit>,
    /// Positions where sender and receiver bases agree.
    pub sifted_indices: Vec<usize>,
}

/// Result of one exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    /// Sender's original bits at the sifted positions.
    pub sender_key: Vec<Bit>,
    /// Receiver's measured bits at the sifted positions.
    pub receiver_key: Vec<Bit>,
    /// Shannon entropy of the sender key.
    pub entropy: f64,
    /// Fidelity of the reference states (always 1.0).
    pub fidelity: f64,
    pub transcript: ExchangeTranscript,
}

impl ExchangeOutcome {
    /// Length of the sifted key (number of basis matches).
    pub fn key_len(&self) -> usize {
        self.sender_key.len()
    }

    /// Sifted positions where the two keys disagree.
    pub fn mismatch_count(&self) -> usize {
        self.sender_key
            .iter()
            .zip(&self.receiver_key)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Quantum bit error rate in `[0, 1]`; 0 for an empty key.
    pub fn error_rate(&self) -> f64 {
        if self.key_len() == 0 {
            return 0.0;
        }
        self.mismatch_count() as f64 / self.key_len() as f64
    }

    /// Whether sender and receiver ended up with the same key.
    pub fn keys_agree(&self) -> bool {
        self.sender_key == self.receiver_key
    }

    /// Whether an eavesdropper intercepted this exchange.
    pub fn eavesdropper_present(&self) -> bool {
        self.transcript.eavesdropper_bases.is_some()
    }
}

/// Indices where the two basis strings agree.
///
/// Both strings must cover the same qubits.
pub fn sift(sender_bases: &[Basis], receiver_bases: &[Basis]) -> QkdResult<Vec<usize>> {
    ensure_same_len(sender_bases.len(), receiver_bases.len())?;
    Ok(sender_bases
        .iter()
        .zip(receiver_bases)
        .enumerate()
        .filter_map(|(i, (a, b))| (a == b).then_some(i))
        .collect())
}

/// Fidelity between the two fixed reference states the exchange reports.
///
/// Both references are `|1⟩`; the value does not depend on the run.
fn reference_fidelity() -> QkdResult<f64> {
    let reference: [Complex64; 2] = Qubit::one().amplitudes();
    fidelity(&reference, &reference)
}

/// Run one exchange with the thread-local RNG.
pub fn run_exchange(qubit_count: usize, eavesdropper: bool) -> QkdResult<ExchangeOutcome> {
    let config = ExchangeConfig::new(qubit_count).with_eavesdropper(eavesdropper);
    run_exchange_with_rng(&config, &mut rand::thread_rng())
}

/// Run one exchange, drawing every random choice and measurement from `rng`.
///
/// Seeding `rng` makes the whole run reproducible:
/// ```rust
/// use qkd_core::{ExchangeConfig, run_exchange_with_rng};
/// use rand::SeedableRng;
///
/// let config = ExchangeConfig::new(64);
/// let a = run_exchange_with_rng(&config, &mut rand::rngs::StdRng::seed_from_u64(7)).unwrap();
/// let b = run_exchange_with_rng(&config, &mut rand::rngs::StdRng::seed_from_u64(7)).unwrap();
/// assert_eq!(a, b);
/// assert!(a.keys_agree());
/// ```
#[instrument(skip(rng))]
pub fn run_exchange_with_rng<R: Rng + ?Sized>(
    config: &ExchangeConfig,
    rng: &mut R,
) -> QkdResult<ExchangeOutcome> {
    ExchangeChoices::random(config, rng)?.execute_with_rng(rng)
}

/// Pooled error statistics over repeated exchanges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub runs: usize,
    /// Total sifted bits across all runs.
    pub sifted_bits: usize,
    /// Total mismatching sifted bits across all runs.
    pub mismatches: usize,
}

impl SurveyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one exchange into the totals.
    pub fn record(&mut self, outcome: &ExchangeOutcome) {
        self.runs += 1;
        self.sifted_bits += outcome.key_len();
        self.mismatches += outcome.mismatch_count();
    }

    /// Pooled error rate over every sifted bit seen.
    pub fn error_rate(&self) -> f64 {
        if self.sifted_bits == 0 {
            return 0.0;
        }
        self.mismatches as f64 / self.sifted_bits as f64
    }
}

/// Run `runs` independent exchanges and pool their error statistics.
pub fn survey_error_rate<R: Rng + ?Sized>(
    config: &ExchangeConfig,
    runs: usize,
    rng: &mut R,
) -> QkdResult<SurveyReport> {
    survey_error_rate_with(config, runs, rng, |_| {})
}

/// Like [`survey_error_rate`], calling `on_run` with the running totals after
/// every exchange.
pub fn survey_error_rate_with<R, F>(
    config: &ExchangeConfig,
    runs: usize,
    rng: &mut R,
    mut on_run: F,
) -> QkdResult<SurveyReport>
where
    R: Rng + ?Sized,
    F: FnMut(&SurveyReport),
{
    if runs == 0 {
        return Err(QkdError::InvalidRunCount(0));
    }

    let mut report = SurveyReport::new();
    for _ in 0..runs {
        let outcome = run_exchange_with_rng(config, rng)?;
        report.record(&outcome);
        on_run(&report);
    }

    debug!(
        runs,
        sifted = report.sifted_bits,
        error_rate = report.error_rate(),
        "survey complete"
    );
    Ok(report)
}
