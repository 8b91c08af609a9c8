// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Cooperative time-sliced batch evolution.
//!
//! The same work as [`Registry::evolve_all`], split into (instance, step)
//! units driven under a caller-supplied wall-time budget: the caller
//! spends a few milliseconds per frame on `continue_sliced` until the
//! computation completes, instead of paying for the whole batch in one
//! call. No unit spans a `continue_sliced` boundary, and the budget is
//! checked between units only, so it is a soft bound: every call completes
//! at least one unit.
//!
//! State machine: Idle → Running (start) → Complete (last continue) → Idle
//! (result retrieval or cancel).

use std::time::{Duration, Instant};

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

use crate::packed;

use super::registry::{advance_unit, refresh_candidates, InstanceSeries, Registry};

/// In-flight snapshot of one sliced computation.
#[derive(Debug, Default)]
pub(crate) struct SlicedState {
    states: Vec<Vec<f64>>,
    total_steps: usize,
    dt: f64,
    max_dt: f64,
    num_instances: usize,
    current_instance: usize,
    current_step: usize,
    current_rho: Option<Array2<Complex64>>,
    results: Vec<InstanceSeries>,
    in_progress: bool,
    complete: bool,
}

impl SlicedState {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Registry {
    /// Capture parameters and reset progress to (instance 0, step 0).
    ///
    /// Any in-flight computation is discarded. Empty input or a zero step
    /// count completes immediately. The supplied states are snapshotted;
    /// later caller-side mutation has no effect on the run.
    pub fn start_sliced(&mut self, states: &[Vec<f64>], steps: usize, dt: f64, max_dt: f64) {
        self.sliced.reset();

        let steps = self.clamp_steps(steps);
        let mut count = states.len();
        if count > self.instances.len() {
            warn!(
                supplied = count,
                registered = self.instances.len(),
                "more states than registered instances; extras ignored"
            );
            count = self.instances.len();
        }
        if count == 0 || steps == 0 {
            self.sliced.complete = true;
            return;
        }

        self.sliced.states = states[..count].to_vec();
        self.sliced.total_steps = steps;
        self.sliced.dt = dt;
        self.sliced.max_dt = max_dt;
        self.sliced.num_instances = count;
        self.sliced.results = vec![InstanceSeries::default(); count];
        self.sliced.in_progress = true;
    }

    /// Perform whole (instance, step) units until the budget is spent or
    /// all work is done.
    ///
    /// Returns `true` once every instance has completed all its steps,
    /// `false` when the budget ran out with work remaining. Elapsed time is
    /// checked after each unit, so even a zero budget makes forward
    /// progress.
    pub fn continue_sliced(&mut self, budget: Duration) -> bool {
        if !self.sliced.in_progress || self.sliced.complete {
            return true;
        }

        let start = Instant::now();
        loop {
            if self.sliced.current_instance >= self.sliced.num_instances {
                break;
            }
            let did_work = self.perform_one_unit();
            let remaining = self.sliced.current_instance < self.sliced.num_instances;
            if did_work && remaining && start.elapsed() >= budget {
                return false;
            }
        }

        self.sliced.complete = true;
        self.sliced.in_progress = false;
        true
    }

    /// Whether the sliced computation has finished (or none is running).
    pub fn is_sliced_complete(&self) -> bool {
        self.sliced.complete || !self.sliced.in_progress
    }

    /// Completed fraction of the total (instance, step) units, in [0, 1].
    pub fn sliced_progress(&self) -> f64 {
        if !self.sliced.in_progress {
            return if self.sliced.complete { 1.0 } else { 0.0 };
        }
        let total = self.sliced.num_instances * self.sliced.total_steps;
        if total == 0 {
            return 1.0;
        }
        let done = self.sliced.current_instance * self.sliced.total_steps + self.sliced.current_step;
        done as f64 / total as f64
    }

    /// Assemble the finished result and reset to Idle.
    ///
    /// Valid only after completion: returns `None` with a diagnostic while
    /// work is still pending.
    pub fn sliced_result(&mut self) -> Option<Vec<InstanceSeries>> {
        if !self.sliced.complete {
            warn!("sliced result requested before completion");
            return None;
        }
        let results = std::mem::take(&mut self.sliced.results);
        self.sliced.reset();
        Some(results)
    }

    /// Discard in-flight progress and return to Idle.
    pub fn cancel_sliced(&mut self) {
        self.sliced.reset();
    }

    /// One unit of work. Returns false when the current instance was
    /// skipped (bad state shape) rather than advanced.
    fn perform_one_unit(&mut self) -> bool {
        let idx = self.sliced.current_instance;
        let dt = self.sliced.dt;
        let max_dt = self.sliced.max_dt;

        let rho = match self.sliced.current_rho.take() {
            Some(rho) => rho,
            None => match self.load_instance_state(idx) {
                Some(rho) => rho,
                None => {
                    self.sliced.current_instance += 1;
                    self.sliced.current_step = 0;
                    return false;
                }
            },
        };
        let first_step = self.sliced.current_step == 0;
        let (next, record) = advance_unit(&mut self.instances[idx], &rho, dt, max_dt, first_step);
        self.sliced.results[idx].push(record);
        self.sliced.current_step += 1;

        if self.sliced.current_step >= self.sliced.total_steps {
            self.sliced.current_instance += 1;
            self.sliced.current_step = 0;
        } else {
            self.sliced.current_rho = Some(next);
        }
        true
    }

    /// Unpack the captured state for one instance at its first unit.
    fn load_instance_state(&mut self, idx: usize) -> Option<Array2<Complex64>> {
        let inst = &mut self.instances[idx];
        match packed::unpack_dense(&self.sliced.states[idx], inst.model.dimension()) {
            Some(rho) => {
                refresh_candidates(inst);
                Some(rho)
            }
            None => {
                warn!(
                    instance = idx,
                    expected = packed::dense_len(inst.model.dimension()),
                    actual = self.sliced.states[idx].len(),
                    "state shape does not match instance dimension; instance skipped"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn damping_q0_coords() -> Vec<f64> {
        vec![0.0, 1.0, 1.0, 0.0, 2.0, 3.0, 1.0, 0.0]
    }

    fn mixed_q0_state() -> Vec<f64> {
        let mut state = vec![0.0; 32];
        state[0] = 0.5;
        state[10] = 0.5;
        state
    }

    fn excited_state() -> Vec<f64> {
        // |11⟩⟨11|: entry (3,3)
        let mut state = vec![0.0; 32];
        state[30] = 1.0;
        state
    }

    fn three_instance_registry() -> (Registry, Vec<Vec<f64>>) {
        let mut registry = Registry::new();
        for _ in 0..3 {
            registry
                .register(4, &[], &[damping_q0_coords()], 2)
                .unwrap();
        }
        let states = vec![mixed_q0_state(), excited_state(), mixed_q0_state()];
        (registry, states)
    }

    #[test]
    fn test_sliced_matches_eager_exactly() {
        let (mut registry, states) = three_instance_registry();
        let eager = registry.evolve_all(&states, 10, 0.05, 0.0);

        registry.start_sliced(&states, 10, 0.05, 0.0);
        let mut continues = 0;
        while !registry.continue_sliced(Duration::ZERO) {
            continues += 1;
        }
        // Zero budget: one unit per call, so 30 units need many calls
        assert!(continues >= 3, "expected at least 3 continues, got {continues}");

        let sliced = registry.sliced_result().unwrap();
        assert_eq!(sliced, eager);
    }

    #[test]
    fn test_generous_budget_completes_in_one_call() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 5, 0.05, 0.0);
        assert!(registry.continue_sliced(Duration::from_secs(60)));
        assert!(registry.is_sliced_complete());
        let results = registry.sliced_result().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].len(), 5);
    }

    #[test]
    fn test_progress_is_monotonic_fraction() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 4, 0.05, 0.0);

        let mut last = registry.sliced_progress();
        assert_relative_eq!(last, 0.0, epsilon = 1e-12);
        while !registry.continue_sliced(Duration::ZERO) {
            let p = registry.sliced_progress();
            assert!(p >= last && p <= 1.0);
            last = p;
        }
        assert_relative_eq!(registry.sliced_progress(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_result_before_completion_is_none() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 10, 0.05, 0.0);
        registry.continue_sliced(Duration::ZERO);
        assert!(registry.sliced_result().is_none());
        // The run is still resumable afterwards
        while !registry.continue_sliced(Duration::ZERO) {}
        assert!(registry.sliced_result().is_some());
    }

    #[test]
    fn test_result_resets_to_idle() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 2, 0.05, 0.0);
        while !registry.continue_sliced(Duration::ZERO) {}
        assert!(registry.sliced_result().is_some());
        // Idle again: a second retrieval has nothing to return
        assert!(registry.sliced_result().is_none());
        assert!(registry.is_sliced_complete());
        assert_relative_eq!(registry.sliced_progress(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cancel_discards_progress() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 10, 0.05, 0.0);
        registry.continue_sliced(Duration::ZERO);
        registry.cancel_sliced();
        assert!(registry.sliced_result().is_none());
        assert!(registry.is_sliced_complete());
    }

    #[test]
    fn test_start_with_empty_input_completes_immediately() {
        let (mut registry, _) = three_instance_registry();
        registry.start_sliced(&[], 10, 0.05, 0.0);
        assert!(registry.is_sliced_complete());
        assert!(registry.continue_sliced(Duration::ZERO));

        registry.start_sliced(&[mixed_q0_state()], 0, 0.05, 0.0);
        assert!(registry.is_sliced_complete());
    }

    #[test]
    fn test_restart_discards_previous_run() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 10, 0.05, 0.0);
        registry.continue_sliced(Duration::ZERO);

        registry.start_sliced(&states[..1], 2, 0.05, 0.0);
        while !registry.continue_sliced(Duration::ZERO) {}
        let results = registry.sliced_result().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 2);
    }

    #[test]
    fn test_bad_state_shape_skips_instance() {
        let (mut registry, mut states) = three_instance_registry();
        states[1] = vec![1.0, 0.0]; // wrong shape
        let eager = registry.evolve_all(&states, 3, 0.05, 0.0);

        registry.start_sliced(&states, 3, 0.05, 0.0);
        while !registry.continue_sliced(Duration::ZERO) {}
        let sliced = registry.sliced_result().unwrap();

        assert!(sliced[1].is_empty());
        assert_eq!(sliced, eager);
    }

    #[test]
    fn test_zero_budget_still_progresses() {
        let (mut registry, states) = three_instance_registry();
        registry.start_sliced(&states, 2, 0.05, 0.0);
        let before = registry.sliced_progress();
        registry.continue_sliced(Duration::ZERO);
        assert!(registry.sliced_progress() > before);
    }
}
