// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Evolution integrators for the Lindblad master equation:
//!
//!   dρ/dt = -i[H, ρ] + Σ_k (L_k ρ L_k† − ½{L_k†L_k, ρ})
//!
//! Two paths are offered, never interleaved:
//!
//! - [`integrate::step`]: first-order explicit (Euler) update of the full
//!   equation, followed by numerical stabilization of the result.
//! - [`unitary::unitary_step`]: exact coherent-term evolution
//!   `ρ' = U ρ U†` with `U = exp(-iH·dt)` from a scaled-and-squared
//!   Padé(13) approximation, for dissipation-free systems or when coherent
//!   accuracy matters more than dissipator accuracy.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002).

pub mod expm;
pub mod integrate;
pub mod unitary;

pub use expm::matrix_exp;
pub use integrate::{effective_dt, evolve, stabilize, step};
pub use unitary::unitary_step;
