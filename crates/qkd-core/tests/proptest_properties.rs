//! Property-based tests for qubit, statistics, cipher and exchange invariants.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qkd_core::{Bit, ExchangeConfig, Qubit, cipher, run_exchange_with_rng, shannon_entropy};

#[derive(Debug, Clone, Copy)]
enum GateOp {
    H,
    X,
}

fn arb_gate_sequence() -> impl Strategy<Value = Vec<GateOp>> {
    prop::collection::vec(prop_oneof![Just(GateOp::H), Just(GateOp::X)], 0..=24)
}

fn apply(q: &mut Qubit, ops: &[GateOp]) {
    for op in ops {
        match op {
            GateOp::H => q.hadamard().unwrap(),
            GateOp::X => q.pauli_x().unwrap(),
        }
    }
}

fn arb_bits(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<Bit>> {
    prop::collection::vec(0u8..=1, len)
}

proptest! {
    #[test]
    fn gates_preserve_unitarity(bit in 0u8..=1, ops in arb_gate_sequence()) {
        let mut q = Qubit::from_bit(bit).unwrap();
        apply(&mut q, &ops);
        prop_assert!((q.norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn hadamard_is_an_involution(bit in 0u8..=1, ops in arb_gate_sequence()) {
        let mut q = Qubit::from_bit(bit).unwrap();
        apply(&mut q, &ops);
        let before = q.amplitudes();
        q.hadamard().unwrap();
        q.hadamard().unwrap();
        for (a, b) in before.iter().zip(&q.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn basis_state_measurement_ignores_draw(bit in 0u8..=1, draw in any::<u32>()) {
        let mut q = Qubit::from_bit(bit).unwrap();
        prop_assert_eq!(q.measure_with_draw(draw).unwrap(), bit);
    }

    #[test]
    fn basis_state_measurement_ignores_seed(bit in 0u8..=1, seed in any::<u64>()) {
        let mut q = Qubit::from_bit(bit).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(q.measure_with_rng(&mut rng).unwrap(), bit);
    }

    #[test]
    fn entropy_is_bounded(bits in arb_bits(1..256)) {
        let h = shannon_entropy(&bits);
        prop_assert!((0.0..=1.0).contains(&h));
    }

    #[test]
    fn balanced_key_has_unit_entropy(half in 1usize..128, seed in any::<u64>()) {
        use rand::seq::SliceRandom;
        let mut bits: Vec<Bit> = std::iter::repeat_n(0, half)
            .chain(std::iter::repeat_n(1, half))
            .collect();
        bits.shuffle(&mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(shannon_entropy(&bits), 1.0);
    }

    #[test]
    fn constant_key_has_zero_entropy(bit in 0u8..=1, len in 1usize..256) {
        prop_assert_eq!(shannon_entropy(&vec![bit; len]), 0.0);
    }

    #[test]
    fn cipher_round_trips(message in "[01]{0,64}", key in arb_bits(1..32)) {
        let ciphertext = cipher::encrypt(&message, &key).unwrap();
        prop_assert_eq!(ciphertext.len(), message.len());
        prop_assert_eq!(cipher::decrypt(&ciphertext, &key).unwrap(), message);
    }

    #[test]
    fn untapped_exchange_keys_agree(n in 1usize..200, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = run_exchange_with_rng(&ExchangeConfig::new(n), &mut rng).unwrap();
        prop_assert!(outcome.key_len() <= n);
        prop_assert_eq!(outcome.key_len(), outcome.transcript.sifted_indices.len());
        prop_assert_eq!(&outcome.sender_key, &outcome.receiver_key);
    }
}
