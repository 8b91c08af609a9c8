// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pairwise quantum mutual information, exact and adaptive.
//!
//! I(A:B) = S(A) + S(B) − S(AB), in bits, over every unordered qubit pair
//! in row-major upper-triangular order. Subadditivity guarantees I ≥ 0;
//! small negative numerical results are clamped to 0.
//!
//! The adaptive path exploits the common case where most pairs are nearly
//! uncorrelated: one screening pass records which pairs deviate from the
//! product of their marginals, and later calls only recompute those
//! candidates. When the caller-supplied global purity is high enough, a
//! linear-entropy approximation replaces the eigendecompositions entirely.
//!
//! Ref: Nielsen & Chuang (2010), §11.3 (subadditivity).

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

use crate::analyze::entropy::{reduced_purity, von_neumann_entropy};
use crate::analyze::ptrace::{reduced_pair, reduced_single};

/// Frobenius-norm-squared deviation below which a pair is screened out.
pub const SCREENING_THRESHOLD: f64 = 1e-3;

/// Above this global purity, candidate MI uses the linear-entropy
/// approximation (no eigendecomposition).
pub const LINEAR_ENTROPY_PURITY_GATE: f64 = 0.9;

/// Number of unordered qubit pairs.
pub fn pair_count(num_qubits: usize) -> usize {
    num_qubits * num_qubits.saturating_sub(1) / 2
}

/// Index of pair `(i, j)`, `i < j`, in row-major upper-triangular order.
pub fn pair_index(i: usize, j: usize, num_qubits: usize) -> usize {
    debug_assert!(i < j && j < num_qubits);
    i * (2 * num_qubits - i - 1) / 2 + (j - i - 1)
}

/// Qubit pairs recorded by one screening pass as carrying non-negligible
/// mutual information.
///
/// Explicit, caller-owned state: the set persists across adaptive calls
/// until cleared, and carries the operator-model finalize epoch it was
/// built against so stale screening results can be detected.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pairs: Vec<(usize, usize)>,
    epoch: u64,
}

impl CandidateSet {
    /// Empty candidate set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded pairs.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Number of candidate pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Recorded pairs, each `(i, j)` with `i < j`.
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Whether `(i, j)` is a recorded candidate.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.pairs.contains(&(i, j))
    }

    /// Finalize epoch this set was screened against.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Tag the set with the epoch it was screened against.
    pub fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }
}

/// Exact mutual information for every qubit pair.
///
/// Single-qubit entropies are computed once per qubit and shared across all
/// pairs, halving the eigendecomposition count relative to a per-pair
/// computation. Output length is `pair_count(n)`; fewer than two qubits
/// yields an empty result, as does a dimension mismatch (with a diagnostic).
pub fn mutual_information_all(rho: &Array2<Complex64>, num_qubits: usize) -> Vec<f64> {
    if num_qubits < 2 {
        return Vec::new();
    }
    if rho.nrows() != (1usize << num_qubits) || rho.ncols() != rho.nrows() {
        warn!(
            rows = rho.nrows(),
            num_qubits, "mutual_information_all dimension mismatch; empty result"
        );
        return Vec::new();
    }

    let marginals: Vec<Array2<Complex64>> = (0..num_qubits)
        .map(|q| reduced_single(rho, q, num_qubits))
        .collect();
    let entropies: Vec<f64> = marginals.iter().map(von_neumann_entropy).collect();

    let mut out = Vec::with_capacity(pair_count(num_qubits));
    for i in 0..num_qubits {
        for j in (i + 1)..num_qubits {
            let rho_ab = reduced_pair(rho, i, j, num_qubits);
            let s_ab = von_neumann_entropy(&rho_ab);
            out.push((entropies[i] + entropies[j] - s_ab).max(0.0));
        }
    }
    out
}

/// Adaptive mutual information with screening and candidate reuse.
///
/// With `rescan = true` every pair is screened: the 4×4 joint reduction is
/// compared against the product of its 2×2 marginals, pairs below
/// [`SCREENING_THRESHOLD`] report 0 and are not recorded, pairs above it
/// are recorded in `candidates` and computed immediately. With
/// `rescan = false` only recorded candidates are recomputed; everything
/// else reports 0 without touching the state.
///
/// Candidate MI uses the linear-entropy approximation
/// `1 − Tr(ρ_A²) − Tr(ρ_B²) + Tr(ρ_AB²)` when `global_purity` exceeds
/// [`LINEAR_ENTROPY_PURITY_GATE`], otherwise the exact entropy formula.
///
/// The candidate set persists until cleared; callers must clear it when the
/// physical configuration changes qualitatively.
pub fn mutual_information_adaptive(
    rho: &Array2<Complex64>,
    num_qubits: usize,
    global_purity: f64,
    rescan: bool,
    candidates: &mut CandidateSet,
) -> Vec<f64> {
    if num_qubits < 2 {
        return Vec::new();
    }
    if rho.nrows() != (1usize << num_qubits) || rho.ncols() != rho.nrows() {
        warn!(
            rows = rho.nrows(),
            num_qubits, "mutual_information_adaptive dimension mismatch; empty result"
        );
        return Vec::new();
    }

    if rescan {
        candidates.clear();

        let marginals: Vec<Array2<Complex64>> = (0..num_qubits)
            .map(|q| reduced_single(rho, q, num_qubits))
            .collect();
        let mut entropy_cache: Vec<Option<f64>> = vec![None; num_qubits];

        let mut out = Vec::with_capacity(pair_count(num_qubits));
        for i in 0..num_qubits {
            for j in (i + 1)..num_qubits {
                let rho_ab = reduced_pair(rho, i, j, num_qubits);
                let product = kron2(&marginals[i], &marginals[j]);
                let deviation = frobenius_sq_diff(&rho_ab, &product);

                if deviation < SCREENING_THRESHOLD {
                    out.push(0.0);
                    continue;
                }

                candidates.pairs.push((i, j));
                out.push(candidate_mi(
                    &marginals[i],
                    &marginals[j],
                    &rho_ab,
                    global_purity,
                    i,
                    j,
                    &mut entropy_cache,
                ));
            }
        }
        out
    } else {
        let mut out = vec![0.0; pair_count(num_qubits)];
        let mut marginals: Vec<Option<Array2<Complex64>>> = vec![None; num_qubits];
        let mut entropy_cache: Vec<Option<f64>> = vec![None; num_qubits];

        for &(i, j) in candidates.pairs.iter() {
            if j >= num_qubits || i >= j {
                warn!(i, j, num_qubits, "stale candidate pair skipped");
                continue;
            }
            if marginals[i].is_none() {
                marginals[i] = Some(reduced_single(rho, i, num_qubits));
            }
            if marginals[j].is_none() {
                marginals[j] = Some(reduced_single(rho, j, num_qubits));
            }
            let (Some(rho_a), Some(rho_b)) = (marginals[i].as_ref(), marginals[j].as_ref())
            else {
                continue;
            };
            let rho_ab = reduced_pair(rho, i, j, num_qubits);
            let mi = candidate_mi(rho_a, rho_b, &rho_ab, global_purity, i, j, &mut entropy_cache);
            out[pair_index(i, j, num_qubits)] = mi;
        }
        out
    }
}

/// MI of one candidate pair, by the purity-selected formula.
fn candidate_mi(
    rho_a: &Array2<Complex64>,
    rho_b: &Array2<Complex64>,
    rho_ab: &Array2<Complex64>,
    global_purity: f64,
    qubit_a: usize,
    qubit_b: usize,
    entropy_cache: &mut [Option<f64>],
) -> f64 {
    if global_purity > LINEAR_ENTROPY_PURITY_GATE {
        let i_lin =
            1.0 - reduced_purity(rho_a) - reduced_purity(rho_b) + reduced_purity(rho_ab);
        i_lin.max(0.0)
    } else {
        let s_a = *entropy_cache[qubit_a].get_or_insert_with(|| von_neumann_entropy(rho_a));
        let s_b = *entropy_cache[qubit_b].get_or_insert_with(|| von_neumann_entropy(rho_b));
        let s_ab = von_neumann_entropy(rho_ab);
        (s_a + s_b - s_ab).max(0.0)
    }
}

/// Tensor product of two 2×2 matrices in the `|ab⟩` basis of
/// [`reduced_pair`].
fn kron2(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = Array2::zeros((4, 4));
    for a_row in 0..2 {
        for b_row in 0..2 {
            for a_col in 0..2 {
                for b_col in 0..2 {
                    out[[a_row * 2 + b_row, a_col * 2 + b_col]] =
                        a[[a_row, a_col]] * b[[b_row, b_col]];
                }
            }
        }
    }
    out
}

/// ‖X − Y‖²_F.
fn frobenius_sq_diff(x: &Array2<Complex64>, y: &Array2<Complex64>) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| (a - b).norm_sqr())
        .sum()
}
