// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Packed-array interchange formats.
//!
//! Callers exchange matrices and state vectors as flat `f64` sequences with
//! interleaved real/imaginary parts:
//!
//! - Dense matrix: row-major, `dim*dim*2` values, `index(i,j) = (i*dim+j)*2`.
//! - State vector: `dim*2` values.
//!
//! The sparse coordinate format (`(row, col, re, im)` quadruples) is parsed
//! in [`crate::operators::sparse`].

use ndarray::Array2;
use num_complex::Complex64;

/// Packed length of a dense `dim × dim` complex matrix.
pub fn dense_len(dim: usize) -> usize {
    dim * dim * 2
}

/// Unpack a dense complex matrix from interleaved row-major reals.
///
/// Returns `None` when the slice length does not match `dim*dim*2`.
pub fn unpack_dense(data: &[f64], dim: usize) -> Option<Array2<Complex64>> {
    if data.len() != dense_len(dim) {
        return None;
    }
    let mut mat = Array2::zeros((dim, dim));
    for i in 0..dim {
        for j in 0..dim {
            let idx = (i * dim + j) * 2;
            mat[[i, j]] = Complex64::new(data[idx], data[idx + 1]);
        }
    }
    Some(mat)
}

/// Pack a dense complex matrix into interleaved row-major reals.
pub fn pack_dense(mat: &Array2<Complex64>) -> Vec<f64> {
    let dim = mat.nrows();
    let mut packed = vec![0.0; dense_len(dim)];
    for i in 0..dim {
        for j in 0..dim {
            let idx = (i * dim + j) * 2;
            packed[idx] = mat[[i, j]].re;
            packed[idx + 1] = mat[[i, j]].im;
        }
    }
    packed
}

/// Unpack an interleaved state vector.
///
/// Returns `None` for odd-length input.
pub fn unpack_state(data: &[f64]) -> Option<Vec<Complex64>> {
    if data.len() % 2 != 0 {
        return None;
    }
    Some(
        data.chunks_exact(2)
            .map(|c| Complex64::new(c[0], c[1]))
            .collect(),
    )
}

/// Pack a complex state vector into interleaved reals.
pub fn pack_state(state: &[Complex64]) -> Vec<f64> {
    let mut packed = Vec::with_capacity(state.len() * 2);
    for z in state {
        packed.push(z.re);
        packed.push(z.im);
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dense_roundtrip() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 0]] = Complex64::new(1.0, 0.0);
        m[[0, 1]] = Complex64::new(0.25, -0.5);
        m[[1, 0]] = Complex64::new(0.25, 0.5);
        m[[1, 1]] = Complex64::new(0.0, 0.0);

        let packed = pack_dense(&m);
        assert_eq!(packed.len(), 8);
        let back = unpack_dense(&packed, 2).unwrap();
        for ((i, j), val) in m.indexed_iter() {
            assert_relative_eq!(val.re, back[[i, j]].re, epsilon = 1e-15);
            assert_relative_eq!(val.im, back[[i, j]].im, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_dense_layout_row_major() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = Complex64::new(3.0, 4.0);
        let packed = pack_dense(&m);
        // index(0,1) = (0*2+1)*2 = 2
        assert_eq!(packed[2], 3.0);
        assert_eq!(packed[3], 4.0);
    }

    #[test]
    fn test_unpack_dense_wrong_length() {
        assert!(unpack_dense(&[0.0; 7], 2).is_none());
        assert!(unpack_dense(&[], 2).is_none());
    }

    #[test]
    fn test_state_roundtrip() {
        let state = vec![Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let packed = pack_state(&state);
        assert_eq!(packed, vec![0.6, 0.0, 0.0, 0.8]);
        let back = unpack_state(&packed).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_unpack_state_odd_length() {
        assert!(unpack_state(&[1.0, 0.0, 0.5]).is_none());
    }
}
