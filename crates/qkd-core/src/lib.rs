//! `qkd-core` — BB84 quantum key distribution simulation.
//!
//! Simulates qubits prepared in random bases, an optional intercept-resend
//! eavesdropper, basis sifting, and the statistics used to judge the
//! resulting key:
//!
//! - [`Qubit`]: single-qubit state with Hadamard / Pauli-X gates and
//!   probabilistic, irreversible measurement
//! - [`Participant`]: encodes bits into qubits and measures them back
//! - [`run_exchange`]: full sender → (eavesdropper) → receiver exchange
//! - [`stats`]: Shannon entropy and state fidelity
//! - [`cipher`]: repeating-key XOR consuming a sifted key
//!
//! All randomness can be injected through a `rand::Rng`, so seeded runs are
//! reproducible.
//!
//! # Quick start
//!
//! ```rust
//! use qkd_core::{ExchangeConfig, cipher, run_exchange_with_rng};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let outcome = run_exchange_with_rng(&ExchangeConfig::new(128), &mut rng).unwrap();
//! assert!(outcome.keys_agree());
//!
//! let ciphertext = cipher::encrypt("1101011011", &outcome.sender_key).unwrap();
//! let plaintext = cipher::decrypt(&ciphertext, &outcome.receiver_key).unwrap();
//! assert_eq!(plaintext, "1101011011");
//! ```

pub mod basis;
pub mod cipher;
pub mod error;
pub mod participant;
pub mod protocol;
pub mod qubit;
pub mod stats;

pub use basis::{Basis, Bit};
pub use error::{QkdError, QkdResult};
pub use participant::Participant;
pub use protocol::{
    ExchangeChoices, ExchangeConfig, ExchangeOutcome, ExchangeTranscript, SurveyReport,
    run_exchange, run_exchange_with_rng, sift, survey_error_rate, survey_error_rate_with,
};
pub use qubit::{MEASUREMENT_RESOLUTION, Qubit};
pub use stats::{fidelity, shannon_entropy};
