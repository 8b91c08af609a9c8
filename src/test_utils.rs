// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test states.
//!
//! Qubit convention matches the analyzer: qubit 0 is the least significant
//! bit of the basis index.

use ndarray::Array2;
use num_complex::Complex64;

/// ρ = |0⟩⟨0| (single qubit).
pub fn ground_state_rho() -> Array2<Complex64> {
    basis_state_rho(2, 0)
}

/// ρ = |1⟩⟨1| (single qubit).
pub fn excited_state_rho() -> Array2<Complex64> {
    basis_state_rho(2, 1)
}

/// ρ = |+⟩⟨+| = ½(I + σx) (single qubit).
pub fn superposition_rho() -> Array2<Complex64> {
    let half = Complex64::new(0.5, 0.0);
    let mut m = Array2::zeros((2, 2));
    m[[0, 0]] = half;
    m[[0, 1]] = half;
    m[[1, 0]] = half;
    m[[1, 1]] = half;
    m
}

/// ρ = |k⟩⟨k| in a `dim`-dimensional space.
pub fn basis_state_rho(dim: usize, k: usize) -> Array2<Complex64> {
    let mut m = Array2::zeros((dim, dim));
    m[[k, k]] = Complex64::new(1.0, 0.0);
    m
}

/// Maximally mixed state I/dim.
pub fn maximally_mixed_rho(dim: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(dim, Complex64::new(1.0 / dim as f64, 0.0))
}

/// Bell state |Φ+⟩ = (|00⟩ + |11⟩)/√2 as a density matrix.
pub fn bell_state_rho() -> Array2<Complex64> {
    let half = Complex64::new(0.5, 0.0);
    let mut m = Array2::zeros((4, 4));
    m[[0, 0]] = half;
    m[[0, 3]] = half;
    m[[3, 0]] = half;
    m[[3, 3]] = half;
    m
}

/// Bell pair on qubits (0, 1) tensored with |0⟩ on qubit 2:
/// (|000⟩ + |011⟩)/√2 as an 8×8 density matrix.
pub fn bell_times_ground_rho() -> Array2<Complex64> {
    let half = Complex64::new(0.5, 0.0);
    let mut m = Array2::zeros((8, 8));
    m[[0, 0]] = half;
    m[[0, 3]] = half;
    m[[3, 0]] = half;
    m[[3, 3]] = half;
    m
}
