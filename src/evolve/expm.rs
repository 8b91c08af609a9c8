// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Matrix exponential via scaling-and-squaring with Padé(13) approximation.
//!
//! Implements the algorithm from:
//!   Higham (2005), "The Scaling and Squaring Method for the Matrix
//!   Exponential Revisited", SIAM J. Matrix Anal. Appl. 26(4), 1179.
//!
//! The unitary evolution path calls this once per step on a `dim × dim`
//! Hamiltonian, so the implementation is tuned for small dense matrices.

use ndarray::Array2;
use num_complex::Complex64;

/// Compute the matrix exponential exp(A) using scaling-and-squaring
/// with Padé(13) approximation.
///
/// # Arguments
/// * `a` - Square complex matrix
///
/// # Returns
/// exp(A) as a complex matrix of the same size
///
/// # Panics
/// Panics if `a` is not square.
pub fn matrix_exp(a: &Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "matrix_exp requires a square matrix");

    if n == 0 {
        return Array2::zeros((0, 0));
    }
    if n == 1 {
        let mut result = Array2::zeros((1, 1));
        result[[0, 0]] = a[[0, 0]].exp();
        return result;
    }

    // Compute infinity norm for scaling
    let norm = matrix_inf_norm(a);

    // Choose scaling parameter j such that ||A/2^j|| < theta_13
    // theta_13 = 5.37 (from Higham Table 10.2)
    let theta_13: f64 = 5.37;
    let j = if norm > theta_13 {
        (norm / theta_13).log2().ceil() as u32
    } else {
        0
    };

    // Scale: A_j = A / 2^j
    let scale = Complex64::new(1.0 / (1u64 << j) as f64, 0.0);
    let a_scaled = a * scale;

    // Padé(13) approximation: exp(A_j) ≈ [p13(A_j)] / [q13(A_j)]
    let result = pade13(&a_scaled);

    // Square j times: exp(A) = (exp(A/2^j))^(2^j)
    square_repeatedly(result, j)
}

/// Padé(13,13) approximation coefficients.
/// From Higham (2005), equation (10.33).
const PADE_COEFFS: [f64; 14] = [
    1.0,
    0.5,
    0.12,
    1.833_333_333_333_333_4e-2,
    1.992_753_623_188_405_8e-3,
    1.630_434_782_608_696e-4,
    1.035_196_687_401_6e-5,
    5.175_983_437_008_01e-7,
    2.043_151_356_652_5e-8,
    6.306_022_705_717_593e-10,
    1.483_770_048_404_14e-11,
    2.529_153_491_597_966e-13,
    2.810_170_546_219_962_4e-15,
    1.544_049_750_670_309e-17,
];

/// Compute Padé(13,13) approximation of exp(A), evaluated Horner-style in
/// powers of A².
fn pade13(a: &Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    let eye = Array2::from_diag_elem(n, Complex64::new(1.0, 0.0));

    // Powers of A²
    let a2 = a.dot(a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);

    // W1 = b13*A6 + b11*A4 + b9*A2
    let w1 = &a6 * c(PADE_COEFFS[13]) + &a4 * c(PADE_COEFFS[11]) + &a2 * c(PADE_COEFFS[9]);

    // W2 = W1*A6 + b7*A6 + b5*A4 + b3*A2 + b1*I
    let w2 = w1.dot(&a6)
        + &a6 * c(PADE_COEFFS[7])
        + &a4 * c(PADE_COEFFS[5])
        + &a2 * c(PADE_COEFFS[3])
        + &eye * c(PADE_COEFFS[1]);

    // U = A * W2 (odd part)
    let u = a.dot(&w2);

    // V1 = b12*A6 + b10*A4 + b8*A2
    let v1 = &a6 * c(PADE_COEFFS[12]) + &a4 * c(PADE_COEFFS[10]) + &a2 * c(PADE_COEFFS[8]);

    // V = V1*A6 + b6*A6 + b4*A4 + b2*A2 + b0*I (even part)
    let v = v1.dot(&a6)
        + &a6 * c(PADE_COEFFS[6])
        + &a4 * c(PADE_COEFFS[4])
        + &a2 * c(PADE_COEFFS[2])
        + &eye * c(PADE_COEFFS[0]);

    // exp(A) ≈ (V + U) / (V - U) = (V - U)^{-1} * (V + U)
    let numerator = &v + &u;
    let denominator = &v - &u;

    // Solve denominator * X = numerator  →  X = denominator^{-1} * numerator
    solve_linear(denominator, numerator)
}

/// Helper: create Complex64 from f64
#[inline]
fn c(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// Solve A · X = B for X by in-place Gaussian elimination with partial
/// pivoting, carrying the right-hand side along.
fn solve_linear(mut a: Array2<Complex64>, mut b: Array2<Complex64>) -> Array2<Complex64> {
    let n = a.nrows();
    assert_eq!(n, a.ncols());
    assert_eq!(n, b.nrows());
    let m = b.ncols();

    for col in 0..n {
        // Partial pivot
        let mut max_val = 0.0;
        let mut max_row = col;
        for row in col..n {
            let val = a[[row, col]].norm();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..n {
                a.swap([col, j], [max_row, j]);
            }
            for j in 0..m {
                b.swap([col, j], [max_row, j]);
            }
        }

        let pivot = a[[col, col]];
        if pivot.norm() < 1e-15 {
            // Near-singular denominator: fall back to the identity
            return Array2::from_diag_elem(n, Complex64::new(1.0, 0.0));
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / pivot;
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for j in col..n {
                let head = a[[col, j]];
                a[[row, j]] -= factor * head;
            }
            for j in 0..m {
                let head = b[[col, j]];
                b[[row, j]] -= factor * head;
            }
        }
    }

    // Back substitution, reusing b as the solution
    for col in (0..n).rev() {
        let pivot = a[[col, col]];
        for j in 0..m {
            let mut sum = b[[col, j]];
            for k in (col + 1)..n {
                sum -= a[[col, k]] * b[[k, j]];
            }
            b[[col, j]] = sum / pivot;
        }
    }
    b
}

/// Square a matrix j times: M^(2^j)
fn square_repeatedly(mut m: Array2<Complex64>, j: u32) -> Array2<Complex64> {
    for _ in 0..j {
        let m2 = m.dot(&m);
        m = m2;
    }
    m
}

/// Infinity norm of a complex matrix: max row sum of absolute values.
fn matrix_inf_norm(a: &Array2<Complex64>) -> f64 {
    let mut max_sum = 0.0f64;
    for i in 0..a.nrows() {
        let mut row_sum = 0.0;
        for j in 0..a.ncols() {
            row_sum += a[[i, j]].norm();
        }
        max_sum = max_sum.max(row_sum);
    }
    max_sum
}
