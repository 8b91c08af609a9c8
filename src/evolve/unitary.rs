// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unitary-only evolution path.
//!
//! Computes `U = exp(-iH·dt)` once per step and applies `ρ' = U ρ U†`. This
//! is exact for the coherent term (to approximation precision), so it is the
//! right path when dissipation is absent or coherent accuracy matters more
//! than dissipator accuracy. It is a separate method from the Euler step,
//! never interleaved with it.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, warn};

use crate::evolve::expm::matrix_exp;
use crate::operators::OperatorModel;

/// Advance ρ by `ρ' = U ρ U†` with `U = exp(-iH·dt)`.
///
/// Requires a ready model; a model without a Hamiltonian evolves trivially
/// (the input is returned unchanged).
pub fn unitary_step(model: &OperatorModel, rho: &Array2<Complex64>, dt: f64) -> Array2<Complex64> {
    if !model.is_ready() {
        warn!("unitary step on a non-finalized operator model; state unchanged");
        return rho.clone();
    }
    if rho.nrows() != model.dimension() || rho.ncols() != model.dimension() {
        warn!(
            expected = model.dimension(),
            rows = rho.nrows(),
            cols = rho.ncols(),
            "density matrix shape does not match model dimension; state unchanged"
        );
        return rho.clone();
    }
    let Some(h) = model.hamiltonian() else {
        debug!("unitary step without a Hamiltonian is the identity");
        return rho.clone();
    };

    let a = h.to_dense() * Complex64::new(0.0, -dt);
    let u = matrix_exp(&a);
    let u_dag = u.t().mapv(|z| z.conj());
    u.dot(rho).dot(&u_dag)
}
