// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compressed sparse row (CSR) complex matrices.
//!
//! Covers exactly the kernels the evolution step needs: construction from
//! coordinate quadruples or a dense matrix, adjoint, sparse·sparse, and the
//! two mixed products sparse·dense and dense·sparse. Not a general sparse
//! library.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

/// Entries with both |re| and |im| at or below this magnitude are treated as
/// absent when building operators from caller input.
pub const DROP_TOLERANCE: f64 = 1e-15;

/// A `dim × dim` complex matrix in CSR form.
#[derive(Debug, Clone)]
pub struct CsrMatrix {
    dim: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<Complex64>,
}

impl CsrMatrix {
    /// Build from flat coordinate quadruples `[row, col, re, im, ...]`.
    ///
    /// Near-zero entries are dropped ([`DROP_TOLERANCE`]). Out-of-range
    /// indices and a trailing partial quadruple are skipped with a
    /// diagnostic. Duplicate coordinates are summed.
    pub fn from_coords(coords: &[f64], dim: usize) -> Self {
        if coords.len() % 4 != 0 {
            warn!(
                len = coords.len(),
                "coordinate list length is not a multiple of 4; trailing entries ignored"
            );
        }

        let mut triplets: Vec<(usize, usize, Complex64)> = Vec::with_capacity(coords.len() / 4);
        for quad in coords.chunks_exact(4) {
            let row = quad[0] as isize;
            let col = quad[1] as isize;
            let re = quad[2];
            let im = quad[3];

            if re.abs() <= DROP_TOLERANCE && im.abs() <= DROP_TOLERANCE {
                continue;
            }
            if row < 0 || col < 0 || row as usize >= dim || col as usize >= dim {
                warn!(row, col, dim, "coordinate entry out of range; skipped");
                continue;
            }
            triplets.push((row as usize, col as usize, Complex64::new(re, im)));
        }

        Self::from_triplets(triplets, dim)
    }

    /// Build from a dense matrix, dropping entries at or below `threshold`.
    pub fn from_dense(mat: &Array2<Complex64>, threshold: f64) -> Self {
        let dim = mat.nrows();
        let mut triplets = Vec::new();
        for ((i, j), z) in mat.indexed_iter() {
            if z.re.abs() > threshold || z.im.abs() > threshold {
                triplets.push((i, j, *z));
            }
        }
        Self::from_triplets(triplets, dim)
    }

    fn from_triplets(mut triplets: Vec<(usize, usize, Complex64)>, dim: usize) -> Self {
        triplets.sort_by_key(|&(r, c, _)| (r, c));

        // Sum duplicates, which are adjacent after the sort
        let mut merged: Vec<(usize, usize, Complex64)> = Vec::with_capacity(triplets.len());
        for (r, c, v) in triplets {
            match merged.last_mut() {
                Some(last) if last.0 == r && last.1 == c => last.2 += v,
                _ => merged.push((r, c, v)),
            }
        }

        let mut row_ptr = vec![0usize; dim + 1];
        for &(r, _, _) in &merged {
            row_ptr[r + 1] += 1;
        }
        for i in 0..dim {
            row_ptr[i + 1] += row_ptr[i];
        }
        let col_idx = merged.iter().map(|&(_, c, _)| c).collect();
        let values = merged.iter().map(|&(_, _, v)| v).collect();

        Self {
            dim,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored-entry fraction, nnz / dim².
    pub fn sparsity(&self) -> f64 {
        let total = self.dim * self.dim;
        if total == 0 {
            0.0
        } else {
            self.nnz() as f64 / total as f64
        }
    }

    /// Entries of one row as `(col, value)` pairs.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, Complex64)> + '_ {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];
        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&c, &v)| (c, v))
    }

    /// Conjugate transpose `A†`.
    pub fn adjoint(&self) -> CsrMatrix {
        let mut triplets = Vec::with_capacity(self.nnz());
        for i in 0..self.dim {
            for (j, v) in self.row(i) {
                triplets.push((j, i, v.conj()));
            }
        }
        Self::from_triplets(triplets, self.dim)
    }

    /// Sparse · sparse product `A·B`.
    pub fn matmul_sparse(&self, other: &CsrMatrix) -> CsrMatrix {
        debug_assert_eq!(self.dim, other.dim);
        let dim = self.dim;
        let mut acc = vec![Complex64::new(0.0, 0.0); dim];
        let mut mark = vec![false; dim];
        let mut touched = Vec::with_capacity(dim);
        let mut triplets = Vec::new();

        for i in 0..dim {
            for (k, a_ik) in self.row(i) {
                for (j, b_kj) in other.row(k) {
                    if !mark[j] {
                        mark[j] = true;
                        touched.push(j);
                    }
                    acc[j] += a_ik * b_kj;
                }
            }
            for &j in &touched {
                let v = acc[j];
                if v != Complex64::new(0.0, 0.0) {
                    triplets.push((i, j, v));
                }
                acc[j] = Complex64::new(0.0, 0.0);
                mark[j] = false;
            }
            touched.clear();
        }

        Self::from_triplets(triplets, dim)
    }

    /// Sparse · dense product `A·M`.
    pub fn mul_dense(&self, rhs: &Array2<Complex64>) -> Array2<Complex64> {
        debug_assert_eq!(self.dim, rhs.nrows());
        let dim = self.dim;
        let mut out = Array2::zeros((dim, dim));
        for i in 0..dim {
            for (k, a_ik) in self.row(i) {
                for j in 0..dim {
                    out[[i, j]] += a_ik * rhs[[k, j]];
                }
            }
        }
        out
    }

    /// Dense · sparse product `M·A`.
    pub fn dense_mul(&self, lhs: &Array2<Complex64>) -> Array2<Complex64> {
        debug_assert_eq!(self.dim, lhs.ncols());
        let dim = self.dim;
        let mut out = Array2::zeros((lhs.nrows(), dim));
        for k in 0..dim {
            for (j, a_kj) in self.row(k) {
                for i in 0..lhs.nrows() {
                    out[[i, j]] += lhs[[i, k]] * a_kj;
                }
            }
        }
        out
    }

    /// Expand to a dense matrix.
    pub fn to_dense(&self) -> Array2<Complex64> {
        let mut out = Array2::zeros((self.dim, self.dim));
        for i in 0..self.dim {
            for (j, v) in self.row(i) {
                out[[i, j]] += v;
            }
        }
        out
    }
}
