// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Von Neumann entropy of (reduced) density matrices.

use ndarray::Array2;
use num_complex::Complex64;

use crate::analyze::eigen::hermitian_eigen;

/// Eigenvalues at or below this floor contribute nothing to the entropy.
pub const EIGENVALUE_FLOOR: f64 = 1e-15;

/// Von Neumann entropy S(ρ) = -Σ λ log₂ λ in bits, clamped ≥ 0.
///
/// Small negative eigenvalues from numerical drift are treated as zero via
/// the floor; the final clamp absorbs residual rounding.
pub fn von_neumann_entropy(reduced: &Array2<Complex64>) -> f64 {
    let (eigenvalues, _) = hermitian_eigen(reduced);

    let mut entropy = 0.0;
    for lambda in eigenvalues {
        if lambda > EIGENVALUE_FLOOR {
            entropy -= lambda * lambda.log2();
        }
    }
    entropy.max(0.0)
}

/// Purity Tr(ρ²) of a reduced matrix, as Σ|ρ_ij|².
pub fn reduced_purity(reduced: &Array2<Complex64>) -> f64 {
    reduced.iter().map(|z| z.norm_sqr()).sum()
}
