// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Setup-time input validation.
//!
//! Registration and configuration calls validate here and return `Result`;
//! per-frame calls do their own soft-failure shape checks and never error.

use crate::config::ResourceLimits;
use crate::error::{Result, ValidationError};
use crate::packed;

/// Validate instance registration parameters.
pub fn validate_registration(
    dim: usize,
    qubit_count: usize,
    hamiltonian_len: usize,
    instance_count: usize,
    limits: &ResourceLimits,
) -> Result<()> {
    if dim == 0 {
        return Err(ValidationError::Field {
            field: "dim".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if dim > limits.max_hilbert_dim {
        return Err(ValidationError::ResourceLimit {
            resource: "dim".into(),
            limit: limits.max_hilbert_dim as u64,
            requested: dim as u64,
        }
        .into());
    }

    if qubit_count > limits.max_qubits {
        return Err(ValidationError::ResourceLimit {
            resource: "qubit_count".into(),
            limit: limits.max_qubits as u64,
            requested: qubit_count as u64,
        }
        .into());
    }

    if instance_count >= limits.max_instances {
        return Err(ValidationError::ResourceLimit {
            resource: "instances".into(),
            limit: limits.max_instances as u64,
            requested: (instance_count + 1) as u64,
        }
        .into());
    }

    // An empty Hamiltonian means "no coherent term"; anything else must be a
    // full packed dense matrix.
    if hamiltonian_len > 0 {
        validate_packed_dense("hamiltonian", hamiltonian_len, dim)?;
    }

    Ok(())
}

/// Validate that a packed dense complex matrix has the expected length.
pub fn validate_packed_dense(what: &str, len: usize, dim: usize) -> Result<()> {
    let expected = packed::dense_len(dim);
    if len != expected {
        return Err(ValidationError::Shape {
            what: what.into(),
            expected,
            actual: len,
        }
        .into());
    }
    Ok(())
}

/// Validate a batch step count against limits.
pub fn validate_steps(steps: usize, limits: &ResourceLimits) -> Result<()> {
    if steps > limits.max_steps {
        return Err(ValidationError::ResourceLimit {
            resource: "steps".into(),
            limit: limits.max_steps as u64,
            requested: steps as u64,
        }
        .into());
    }
    Ok(())
}
