// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-qubit Bloch-sphere coordinates.
//!
//! For each qubit the 2×2 reduced state yields one packet of
//! [`BLOCH_STRIDE`] reals: `(p0, p1, x, y, z, r, θ, φ)`. Consumers index
//! packets by `qubit * BLOCH_STRIDE`.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

use crate::analyze::ptrace::reduced_single;

/// Values per qubit in the packed Bloch output.
pub const BLOCH_STRIDE: usize = 8;

/// Below this Bloch radius the spherical angles are reported as 0.
pub const DEGENERATE_RADIUS: f64 = 1e-12;

/// Bloch metrics for every qubit of an `n`-qubit state.
///
/// Output layout: `n * 8` reals, `(p0, p1, x, y, z, r, θ, φ)` per qubit.
/// Returns empty with a diagnostic when `rho` is not `2^n × 2^n` or `n` is 0.
pub fn bloch_metrics(rho: &Array2<Complex64>, num_qubits: usize) -> Vec<f64> {
    if num_qubits == 0 || rho.nrows() != (1usize << num_qubits) || rho.ncols() != rho.nrows() {
        warn!(
            rows = rho.nrows(),
            num_qubits, "bloch_metrics dimension mismatch; empty result"
        );
        return Vec::new();
    }

    let mut out = Vec::with_capacity(num_qubits * BLOCH_STRIDE);
    for qubit in 0..num_qubits {
        let reduced = reduced_single(rho, qubit, num_qubits);

        let p0 = reduced[[0, 0]].re;
        let p1 = reduced[[1, 1]].re;
        let x = 2.0 * reduced[[0, 1]].re;
        let y = -2.0 * reduced[[0, 1]].im;
        let z = p0 - p1;
        let r = (x * x + y * y + z * z).sqrt();

        let (theta, phi) = if r > DEGENERATE_RADIUS {
            ((z / r).clamp(-1.0, 1.0).acos(), y.atan2(x))
        } else {
            (0.0, 0.0)
        };

        out.extend_from_slice(&[p0, p1, x, y, z, r, theta, phi]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        basis_state_rho, bell_state_rho, ground_state_rho, superposition_rho,
    };
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_single_qubit_ground_state() {
        let out = bloch_metrics(&ground_state_rho(), 1);
        assert_eq!(out.len(), 8);
        let (p0, p1, z, r) = (out[0], out[1], out[4], out[5]);
        assert_relative_eq!(p0, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p1, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
        // North pole: θ = 0
        assert_relative_eq!(out[6], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_qubit_plus_state() {
        let out = bloch_metrics(&superposition_rho(), 1);
        let (x, y, z, r) = (out[2], out[3], out[4], out[5]);
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r, 1.0, epsilon = 1e-12);
        // Equator: θ = π/2, φ = 0
        assert_relative_eq!(out[6], FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(out[7], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_y_axis_state_phi() {
        // (|0⟩ + i|1⟩)/√2 points along +y
        let half = Complex64::new(0.5, 0.0);
        let mut rho = Array2::zeros((2, 2));
        rho[[0, 0]] = half;
        rho[[1, 1]] = half;
        rho[[0, 1]] = Complex64::new(0.0, -0.5);
        rho[[1, 0]] = Complex64::new(0.0, 0.5);

        let out = bloch_metrics(&rho, 1);
        assert_relative_eq!(out[3], 1.0, epsilon = 1e-12); // y
        assert_relative_eq!(out[7], FRAC_PI_2, epsilon = 1e-12); // φ
    }

    #[test]
    fn test_bell_qubits_are_degenerate() {
        // Each Bell marginal is maximally mixed: r = 0, angles reported as 0
        let out = bloch_metrics(&bell_state_rho(), 2);
        assert_eq!(out.len(), 16);
        for qubit in 0..2 {
            let base = qubit * BLOCH_STRIDE;
            assert_relative_eq!(out[base], 0.5, epsilon = 1e-12);
            assert_relative_eq!(out[base + 1], 0.5, epsilon = 1e-12);
            assert_relative_eq!(out[base + 5], 0.0, epsilon = 1e-10);
            assert_eq!(out[base + 6], 0.0);
            assert_eq!(out[base + 7], 0.0);
        }
    }

    #[test]
    fn test_two_qubit_product_state() {
        // |01⟩: qubit 0 excited, qubit 1 ground
        let out = bloch_metrics(&basis_state_rho(4, 1), 2);
        // Qubit 0: z = -1
        assert_relative_eq!(out[4], -1.0, epsilon = 1e-12);
        // Qubit 1: z = +1
        assert_relative_eq!(out[BLOCH_STRIDE + 4], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch_yields_empty() {
        assert!(bloch_metrics(&ground_state_rho(), 2).is_empty());
        assert!(bloch_metrics(&ground_state_rho(), 0).is_empty());
    }
}
