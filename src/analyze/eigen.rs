// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Hermitian eigendecomposition via cyclic Jacobi rotations.
//!
//! The matrices this engine decomposes are small (2×2 and 4×4 reduced
//! states, full states up to the configured dimension cap), so a dense
//! Jacobi sweep is both simpler and more predictable than binding an
//! external LAPACK. Complex rotations zero one off-diagonal pair at a time;
//! sweeps repeat until the off-diagonal Frobenius norm is negligible.
//!
//! Ref: Golub & Van Loan, "Matrix Computations" (4th ed.), §8.5.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

use crate::packed;

const MAX_SWEEPS: usize = 64;
const OFF_DIAGONAL_TOLERANCE: f64 = 1e-22;

/// Eigendecomposition of a density matrix, ordered for consumers that want
/// the dominant component first.
#[derive(Debug, Clone, Default)]
pub struct EigenStates {
    /// Eigenvalues in descending order.
    pub eigenvalues: Vec<f64>,
    /// Eigenvector of the largest eigenvalue, packed interleaved re/im.
    pub dominant: Vec<f64>,
}

/// Eigendecomposition of a Hermitian matrix.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvalues in descending
/// order and the matching eigenvectors as columns. Only the Hermitian part
/// of the input influences the result (the strict lower triangle is taken
/// as the conjugate of the upper).
pub fn hermitian_eigen(m: &Array2<Complex64>) -> (Vec<f64>, Array2<Complex64>) {
    let n = m.nrows();
    debug_assert_eq!(n, m.ncols());

    let mut a = m.clone();
    let mut v: Array2<Complex64> = Array2::from_diag_elem(n, Complex64::new(1.0, 0.0));

    for _sweep in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]].norm_sqr();
            }
        }
        if off < OFF_DIAGONAL_TOLERANCE {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let g = a[[p, q]];
                let abs_g = g.norm();
                if abs_g == 0.0 {
                    continue;
                }
                let phase = g / abs_g;

                // Rotation angle zeroing a[p][q]
                let tau = (a[[q, q]].re - a[[p, p]].re) / (2.0 * abs_g);
                let t = if tau >= 0.0 {
                    1.0 / (tau + (1.0 + tau * tau).sqrt())
                } else {
                    -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                let sp = phase * s;

                // Columns: col_p ← c·col_p − s̄·col_q, col_q ← s·col_p + c·col_q
                for i in 0..n {
                    let aip = a[[i, p]];
                    let aiq = a[[i, q]];
                    a[[i, p]] = aip * c - aiq * sp.conj();
                    a[[i, q]] = aip * sp + aiq * c;
                }
                // Rows: row_p ← c·row_p − s·row_q, row_q ← s̄·row_p + c·row_q
                for j in 0..n {
                    let apj = a[[p, j]];
                    let aqj = a[[q, j]];
                    a[[p, j]] = apj * c - aqj * sp;
                    a[[q, j]] = apj * sp.conj() + aqj * c;
                }
                // Accumulate eigenvectors (columns)
                for i in 0..n {
                    let vip = v[[i, p]];
                    let viq = v[[i, q]];
                    v[[i, p]] = vip * c - viq * sp.conj();
                    v[[i, q]] = vip * sp + viq * c;
                }
            }
        }
    }

    // Sort descending, carrying eigenvector columns along
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        a[[j, j]]
            .re
            .partial_cmp(&a[[i, i]].re)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let eigenvalues: Vec<f64> = order.iter().map(|&i| a[[i, i]].re).collect();
    let mut vectors = Array2::zeros((n, n));
    for (new_col, &old_col) in order.iter().enumerate() {
        for i in 0..n {
            vectors[[i, new_col]] = v[[i, old_col]];
        }
    }

    (eigenvalues, vectors)
}

/// Eigenvalues of a density matrix in descending order, plus the dominant
/// eigenvector packed interleaved.
///
/// Empty input or a non-square matrix yields an empty result with a
/// diagnostic.
pub fn eigenstates(rho: &Array2<Complex64>) -> EigenStates {
    let n = rho.nrows();
    if n == 0 || rho.ncols() != n {
        warn!(
            rows = rho.nrows(),
            cols = rho.ncols(),
            "eigenstates requires a non-empty square matrix"
        );
        return EigenStates::default();
    }

    let (eigenvalues, vectors) = hermitian_eigen(rho);
    let dominant_col: Vec<Complex64> = (0..n).map(|i| vectors[[i, 0]]).collect();

    EigenStates {
        eigenvalues,
        dominant: packed::pack_state(&dominant_col),
    }
}
