//! Tests for single-qubit gates and measurement.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::rngs::mock::StepRng;

use qkd_core::{MEASUREMENT_RESOLUTION, QkdError, Qubit};

// ---------------------------------------------------------------------------
// Gates
// ---------------------------------------------------------------------------

#[test]
fn hadamard_twice_restores_state() {
    for bit in [0, 1] {
        let mut q = Qubit::from_bit(bit).unwrap();
        let before = q.amplitudes();
        q.hadamard().unwrap();
        q.hadamard().unwrap();
        let after = q.amplitudes();
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).norm() < 1e-12);
        }
    }
}

#[test]
fn gates_preserve_norm() {
    let mut q = Qubit::one();
    for step in 0..12 {
        if step % 3 == 0 {
            q.pauli_x().unwrap();
        } else {
            q.hadamard().unwrap();
        }
        assert!((q.norm_sqr() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn pauli_x_flips_basis_states() {
    let mut q = Qubit::zero();
    q.pauli_x().unwrap();
    assert_eq!(q.describe(), "|1>");
    q.pauli_x().unwrap();
    assert_eq!(q.describe(), "|0>");
}

// ---------------------------------------------------------------------------
// Measurement
// ---------------------------------------------------------------------------

#[test]
fn basis_states_measure_deterministically_for_any_draw() {
    let draws = [0, 1, 504_100, MEASUREMENT_RESOLUTION - 1, u32::MAX];
    for bit in [0, 1] {
        for draw in draws {
            let mut q = Qubit::from_bit(bit).unwrap();
            assert_eq!(q.measure_with_draw(draw).unwrap(), bit, "draw {draw}");
        }
    }
}

#[test]
fn mocked_rng_does_not_change_basis_outcome() {
    for bit in [0, 1] {
        let mut rng = StepRng::new(0, 1);
        for _ in 0..10 {
            let mut q = Qubit::from_bit(bit).unwrap();
            assert_eq!(q.measure_with_rng(&mut rng).unwrap(), bit);
        }
    }
}

#[test]
fn rotated_basis_states_survive_matching_measurement() {
    // H|b⟩ followed by H before measuring is certain to give b back.
    let mut rng = StdRng::seed_from_u64(99);
    for bit in [0, 1] {
        for _ in 0..50 {
            let mut q = Qubit::from_bit(bit).unwrap();
            q.hadamard().unwrap();
            q.hadamard().unwrap();
            assert_eq!(q.measure_with_rng(&mut rng).unwrap(), bit);
        }
    }
}

#[test]
fn superposition_outcomes_follow_rounded_probability() {
    let mut rng = StdRng::seed_from_u64(2024);
    let shots = 20_000;
    let zeros = (0..shots)
        .filter(|_| {
            let mut q = Qubit::zero();
            q.hadamard().unwrap();
            q.measure_with_rng(&mut rng).unwrap() == 0
        })
        .count();
    let freq = zeros as f64 / shots as f64;
    // p0 = 0.71² = 0.5041
    assert!((freq - 0.5041).abs() < 0.02, "freq = {freq}");
}

#[test]
fn operations_after_measurement_fail() {
    let mut q = Qubit::zero();
    q.hadamard().unwrap();
    q.measure().unwrap();

    assert!(q.is_measured());
    assert_eq!(q.hadamard(), Err(QkdError::AlreadyMeasured));
    assert_eq!(q.pauli_x(), Err(QkdError::AlreadyMeasured));
    assert_eq!(q.measure(), Err(QkdError::AlreadyMeasured));
    assert_eq!(q.measure_with_draw(0), Err(QkdError::AlreadyMeasured));
    assert!(!QkdError::AlreadyMeasured.is_invalid_input());
}

#[test]
fn describe_is_available_after_measurement() {
    let mut q = Qubit::one();
    q.measure().unwrap();
    assert_eq!(q.describe(), "|1>");
}
