// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Open quantum system evolution and entanglement-analysis core.
//!
//! Advances density matrices under the Lindblad master equation
//!
//!   dρ/dt = -i[H, ρ] + Σ_k (L_k ρ L_k† − ½{L_k†L_k, ρ})
//!
//! and derives observables (purity, Bloch coordinates, pairwise mutual
//! information, dominant eigenstates) cheaply enough to run every
//! simulation tick for many independent systems at once.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │       Instance Registry & Orchestrator      │
//! │   eager batch        time-sliced (budget)   │
//! ├──────────────────────┬──────────────────────┤
//! │  Evolution           │  Observable &        │
//! │  Integrator          │  Entanglement        │
//! │  (Euler + expm)      │  Analyzer            │
//! ├──────────────────────┴──────────────────────┤
//! │              Operator Model                 │
//! │        H, {L_k}, cached L†, L†L             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`operators`]: Hamiltonian / Lindblad operator model (sparse, CSR)
//! - [`evolve`]: Euler integrator with stabilization; Padé-13 unitary path
//! - [`analyze`]: partial traces, entropies, Bloch metrics, mutual
//!   information with adaptive screening
//! - [`batch`]: multi-instance registry, eager and time-sliced drivers
//! - [`packed`]: flat interleaved interchange formats
//! - [`config`]: limits, pacing, logging configuration
//! - [`error`]: setup-time error types
//!
//! All per-frame calls are synchronous, single-threaded, and soft-failing:
//! invalid input yields an unchanged/empty result plus a `tracing`
//! diagnostic, never a panic or error.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod error;
pub mod evolve;
pub mod operators;
pub mod packed;
pub mod validation;

pub use analyze::{
    bloch_metrics, eigenstates, mutual_information_adaptive, mutual_information_all, purity,
    state_overlap, trace, CandidateSet, EigenStates,
};
pub use batch::{InstanceSeries, Registry};
pub use config::Config;
pub use error::{Error, Result};
pub use evolve::{matrix_exp, unitary_step};
pub use operators::OperatorModel;

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
