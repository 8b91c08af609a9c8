// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator model: Hamiltonian, Lindblad operators, and their derived cache.
//!
//! The model is built incrementally across several setup calls and then
//! sealed with [`OperatorModel::finalize`], which precomputes `L†` and `L†L`
//! for every registered jump operator. Evolution requires a finalized
//! ("ready") model; mutators called out of order are no-ops that report a
//! diagnostic instead of raising, since a caller typically assembles the
//! model over multiple frames before first use.

use tracing::{debug, warn};

use crate::operators::sparse::{CsrMatrix, DROP_TOLERANCE};
use crate::packed;

/// Hamiltonian and dissipation operators for one system, with cached
/// derived forms.
#[derive(Debug, Clone, Default)]
pub struct OperatorModel {
    dim: usize,
    hamiltonian: Option<CsrMatrix>,
    lindblads: Vec<CsrMatrix>,
    // Derived cache, valid only while `ready`
    lindblad_dags: Vec<CsrMatrix>,
    ldag_ls: Vec<CsrMatrix>,
    ready: bool,
    finalize_epoch: u64,
}

impl OperatorModel {
    /// Create an empty, dimensionless model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the model to an unfinalized state for the given dimension.
    ///
    /// All previously set operators and derived state are dropped.
    pub fn set_dimension(&mut self, dim: usize) {
        self.dim = dim;
        self.hamiltonian = None;
        self.lindblads.clear();
        self.lindblad_dags.clear();
        self.ldag_ls.clear();
        self.ready = false;
    }

    /// Set the Hamiltonian from a packed dense row-major complex matrix.
    ///
    /// Entries at or below the drop tolerance are discarded so sparse
    /// Hamiltonians stay sparse. Marks the model not-ready.
    pub fn set_hamiltonian(&mut self, h_packed: &[f64]) {
        if self.dim == 0 {
            warn!("set_hamiltonian called before set_dimension; ignored");
            return;
        }
        let Some(dense) = packed::unpack_dense(h_packed, self.dim) else {
            warn!(
                expected = packed::dense_len(self.dim),
                actual = h_packed.len(),
                "Hamiltonian packed length does not match dimension; ignored"
            );
            return;
        };
        self.hamiltonian = Some(CsrMatrix::from_dense(&dense, DROP_TOLERANCE));
        self.ready = false;
    }

    /// Append one Lindblad operator from flat `(row, col, re, im)` quadruples.
    ///
    /// Marks the model not-ready.
    pub fn add_lindblad_coords(&mut self, coords: &[f64]) {
        if self.dim == 0 {
            warn!("add_lindblad_coords called before set_dimension; ignored");
            return;
        }
        self.lindblads.push(CsrMatrix::from_coords(coords, self.dim));
        self.ready = false;
    }

    /// Drop the Hamiltonian, all Lindblad operators, and the derived cache.
    ///
    /// The dimension is retained.
    pub fn clear_operators(&mut self) {
        self.hamiltonian = None;
        self.lindblads.clear();
        self.lindblad_dags.clear();
        self.ldag_ls.clear();
        self.ready = false;
    }

    /// Precompute `L†` and `L†L` for every registered operator and mark the
    /// model ready.
    ///
    /// Must be called after any mutation and before any evolution call.
    /// Each call advances the finalize epoch, which downstream candidate
    /// sets use to detect stale screening results.
    pub fn finalize(&mut self) {
        self.lindblad_dags.clear();
        self.ldag_ls.clear();
        self.lindblad_dags.reserve(self.lindblads.len());
        self.ldag_ls.reserve(self.lindblads.len());

        for l in &self.lindblads {
            let l_dag = l.adjoint();
            let ldag_l = l_dag.matmul_sparse(l);
            self.lindblad_dags.push(l_dag);
            self.ldag_ls.push(ldag_l);
        }

        self.ready = true;
        self.finalize_epoch += 1;
        debug!(
            dim = self.dim,
            lindblads = self.lindblads.len(),
            epoch = self.finalize_epoch,
            "operator model finalized"
        );
    }

    /// Hilbert-space dimension (0 when unset).
    pub fn dimension(&self) -> usize {
        self.dim
    }

    /// Number of registered Lindblad operators.
    pub fn lindblad_count(&self) -> usize {
        self.lindblads.len()
    }

    /// Whether a Hamiltonian has been set.
    pub fn has_hamiltonian(&self) -> bool {
        self.hamiltonian.is_some()
    }

    /// Whether the model is finalized and consistent with its operator set.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Monotone counter advanced by every [`finalize`](Self::finalize) call.
    pub fn finalize_epoch(&self) -> u64 {
        self.finalize_epoch
    }

    /// The Hamiltonian, if set.
    pub(crate) fn hamiltonian(&self) -> Option<&CsrMatrix> {
        self.hamiltonian.as_ref()
    }

    /// Registered Lindblad operators.
    pub(crate) fn lindblads(&self) -> &[CsrMatrix] {
        &self.lindblads
    }

    /// Cached adjoints, populated by finalize.
    pub(crate) fn lindblad_dags(&self) -> &[CsrMatrix] {
        &self.lindblad_dags
    }

    /// Cached `L†L` products, populated by finalize.
    pub(crate) fn ldag_ls(&self) -> &[CsrMatrix] {
        &self.ldag_ls
    }
}
