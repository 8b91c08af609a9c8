// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator model for open-system evolution.
//!
//! Holds the Hamiltonian and the set of Lindblad (jump) operators for one
//! system, together with their precomputed derived forms (`L†`, `L†L`), in a
//! single explicit "ready" state. Operators are stored sparse: the inputs
//! this engine sees are dominated by few-entry jump operators and
//! nearest-neighbour Hamiltonians.

pub mod model;
pub mod sparse;

pub use model::OperatorModel;
pub use sparse::CsrMatrix;
