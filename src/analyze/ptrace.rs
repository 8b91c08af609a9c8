// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Partial traces onto one- and two-qubit subsystems.
//!
//! Both reductions work by direct bit-mask summation over the complementary
//! qubits: for each element of the reduced matrix, sum the full-matrix
//! elements whose traced-out qubits carry the same value in row and column
//! index. No intermediate reshapes or permutations are allocated.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

/// Trace out all qubits except `qubit`, returning the 2×2 reduced density
/// matrix.
///
/// Returns a zero matrix with a diagnostic when `rho` is not `2^n × 2^n` or
/// `qubit` is out of range.
pub fn reduced_single(rho: &Array2<Complex64>, qubit: usize, num_qubits: usize) -> Array2<Complex64> {
    let dim = 1usize << num_qubits;
    let mut reduced = Array2::zeros((2, 2));

    if rho.nrows() != dim || rho.ncols() != dim || qubit >= num_qubits {
        warn!(
            rows = rho.nrows(),
            dim, qubit, num_qubits, "invalid single-qubit reduction request"
        );
        return reduced;
    }

    for a in 0..2usize {
        for b in 0..2usize {
            let mut sum = Complex64::new(0.0, 0.0);

            // Sum over all values of the complementary qubits, identical in
            // row and column (the trace condition).
            for other_bits in 0..(1usize << (num_qubits - 1)) {
                let mut row_idx = 0usize;
                let mut col_idx = 0usize;
                let mut bit_pos = 0usize;
                for q in 0..num_qubits {
                    if q == qubit {
                        row_idx |= a << q;
                        col_idx |= b << q;
                    } else {
                        let other_bit = (other_bits >> bit_pos) & 1;
                        row_idx |= other_bit << q;
                        col_idx |= other_bit << q;
                        bit_pos += 1;
                    }
                }
                sum += rho[[row_idx, col_idx]];
            }
            reduced[[a, b]] = sum;
        }
    }
    reduced
}

/// Trace out all qubits except `qubit_a` and `qubit_b`, returning the 4×4
/// reduced density matrix.
///
/// Basis order: `|ab⟩` with the first digit belonging to `qubit_a`
/// (reduced index = `a*2 + b`), regardless of how the two qubits are ordered
/// in the full register.
///
/// Returns a zero matrix with a diagnostic for invalid requests.
pub fn reduced_pair(
    rho: &Array2<Complex64>,
    qubit_a: usize,
    qubit_b: usize,
    num_qubits: usize,
) -> Array2<Complex64> {
    let dim = 1usize << num_qubits;
    let mut reduced = Array2::zeros((4, 4));

    if rho.nrows() != dim
        || rho.ncols() != dim
        || qubit_a >= num_qubits
        || qubit_b >= num_qubits
        || qubit_a == qubit_b
        || num_qubits < 2
    {
        warn!(
            rows = rho.nrows(),
            dim, qubit_a, qubit_b, num_qubits, "invalid pair reduction request"
        );
        return reduced;
    }

    let other_qubits = num_qubits - 2;

    for row_ab in 0..4usize {
        for col_ab in 0..4usize {
            let a_row = (row_ab >> 1) & 1;
            let b_row = row_ab & 1;
            let a_col = (col_ab >> 1) & 1;
            let b_col = col_ab & 1;

            let mut sum = Complex64::new(0.0, 0.0);

            for other_bits in 0..(1usize << other_qubits) {
                let mut row_idx = 0usize;
                let mut col_idx = 0usize;
                let mut bit_pos = 0usize;

                for q in 0..num_qubits {
                    if q == qubit_a {
                        row_idx |= a_row << q;
                        col_idx |= a_col << q;
                    } else if q == qubit_b {
                        row_idx |= b_row << q;
                        col_idx |= b_col << q;
                    } else {
                        let other_bit = (other_bits >> bit_pos) & 1;
                        row_idx |= other_bit << q;
                        col_idx |= other_bit << q;
                        bit_pos += 1;
                    }
                }
                sum += rho[[row_idx, col_idx]];
            }
            reduced[[row_ab, col_ab]] = sum;
        }
    }
    reduced
}
