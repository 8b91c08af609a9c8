// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scalar observables on density matrices and packed state vectors.

use ndarray::Array2;
use num_complex::Complex64;

use crate::packed;

/// Purity Tr(ρ²), computed as Σ_ij |ρ_ij|².
///
/// For Hermitian ρ this equals the trace of ρ² without forming the product.
/// Clamped ≥ 0 against numerical drift.
pub fn purity(rho: &Array2<Complex64>) -> f64 {
    let sum: f64 = rho.iter().map(|z| z.norm_sqr()).sum();
    sum.max(0.0)
}

/// Complex trace of ρ.
///
/// The imaginary part should be ≈ 0 for a valid state; it is exposed for
/// diagnostics rather than hidden.
pub fn trace(rho: &Array2<Complex64>) -> Complex64 {
    let dim = rho.nrows().min(rho.ncols());
    let mut tr = Complex64::new(0.0, 0.0);
    for i in 0..dim {
        tr += rho[[i, i]];
    }
    tr
}

/// Squared overlap |⟨a|b⟩|² of two packed state vectors.
///
/// Returns 0 for mismatched lengths, odd-length data, or empty input.
pub fn state_overlap(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let (Some(va), Some(vb)) = (packed::unpack_state(a), packed::unpack_state(b)) else {
        return 0.0;
    };

    let mut inner = Complex64::new(0.0, 0.0);
    for (za, zb) in va.iter().zip(vb.iter()) {
        inner += za.conj() * zb;
    }
    inner.norm_sqr()
}
