// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Observable and entanglement analysis on density matrices.
//!
//! Everything here is read-only with respect to the state: the analyzer
//! derives scalars and vectors from a density matrix without mutating it,
//! and depends only on dimensions, never on the operator model's contents.
//!
//! Qubit convention throughout: qubit `q` is bit `q` of the basis-state
//! index, so qubit 0 is the least significant bit.
//!
//! Invalid input (dimension mismatch, non-square packed data, fewer than
//! two qubits for pairwise quantities) yields an empty result plus a
//! diagnostic rather than an error; callers are expected to check sizes.

pub mod bloch;
pub mod eigen;
pub mod entropy;
pub mod mutual_info;
pub mod observables;
pub mod ptrace;

pub use bloch::bloch_metrics;
pub use eigen::{eigenstates, hermitian_eigen, EigenStates};
pub use entropy::von_neumann_entropy;
pub use mutual_info::{
    mutual_information_adaptive, mutual_information_all, pair_count, CandidateSet,
};
pub use observables::{purity, state_overlap, trace};
pub use ptrace::{reduced_pair, reduced_single};
