// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Instance registry and batch orchestration.
//!
//! Owns many independent (operator model, candidate set) instances, each
//! with its own qubit count, and advances all of them in one call so a
//! frame loop pays one call per tick instead of one per instance per step.
//! Two driving modes share the same per-unit code path:
//!
//! - eager: [`Registry::evolve_all`] / [`Registry::evolve_one`] run every
//!   (instance, step) unit back-to-back and return full time series;
//! - cooperative: `start_sliced` / `continue_sliced` perform whole units
//!   under a caller-supplied wall-time budget, yielding between units
//!   (see [`sliced`]).

pub mod registry;
pub mod sliced;

pub use registry::{InstanceSeries, Registry};
