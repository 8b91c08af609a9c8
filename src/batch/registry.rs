// Copyright 2026 Lindblad Core Contributors
// SPDX-License-Identifier: Apache-2.0

//! Instance registry and eager batch evolution.
//!
//! Registration builds and finalizes one operator model per instance under
//! a freshly allocated sequential id. Evolution returns the full per-step
//! series (state, Bloch packets, purity, mutual information) so a consumer
//! can interpolate or render intermediate frames without further calls.

use std::time::Duration;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{info, warn};

use crate::analyze::bloch::bloch_metrics;
use crate::analyze::mutual_info::{mutual_information_adaptive, CandidateSet};
use crate::analyze::observables::purity;
use crate::config::{Config, ResourceLimits};
use crate::error::Result;
use crate::evolve;
use crate::operators::OperatorModel;
use crate::packed;
use crate::validation;

use super::sliced::SlicedState;

/// One registered system: its finalized operator model, its qubit count
/// (metadata that sizes the entanglement-pair output, independent of the
/// Hilbert dimension), and its screening candidate set.
#[derive(Debug)]
pub(crate) struct Instance {
    pub(crate) model: OperatorModel,
    pub(crate) qubit_count: usize,
    pub(crate) candidates: CandidateSet,
}

/// Per-step output of one evolution unit.
#[derive(Debug, Clone)]
pub(crate) struct StepRecord {
    pub(crate) state: Vec<f64>,
    pub(crate) bloch: Vec<f64>,
    pub(crate) purity: f64,
    pub(crate) mutual_information: Vec<f64>,
}

/// Full time series for one instance over one batch run.
///
/// All vectors have one entry per completed step, in step order. An empty
/// series signals a soft failure (invalid id or state shape).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceSeries {
    /// Evolved density matrices, packed row-major interleaved.
    pub states: Vec<Vec<f64>>,
    /// Bloch packets, `qubit_count * 8` reals per step.
    pub bloch: Vec<Vec<f64>>,
    /// Full-state purity per step.
    pub purity: Vec<f64>,
    /// Pairwise mutual information per step, upper-triangular order.
    pub mutual_information: Vec<Vec<f64>>,
}

impl InstanceSeries {
    /// Number of completed steps.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no steps were recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Mutual information of the final step, if any.
    pub fn final_mutual_information(&self) -> Option<&[f64]> {
        self.mutual_information.last().map(|v| v.as_slice())
    }

    pub(crate) fn push(&mut self, record: StepRecord) {
        self.states.push(record.state);
        self.bloch.push(record.bloch);
        self.purity.push(record.purity);
        self.mutual_information.push(record.mutual_information);
    }
}

/// Registry of evolution instances with batch and time-sliced driving.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) instances: Vec<Instance>,
    limits: ResourceLimits,
    inter_step_delay: Duration,
    pub(crate) sliced: SlicedState,
}

impl Registry {
    /// Registry with default limits and no pacing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with explicit resource limits.
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    /// Registry configured from a loaded [`Config`].
    pub fn with_config(config: &Config) -> Self {
        Self {
            limits: config.limits.clone(),
            inter_step_delay: Duration::from_millis(config.pacing.inter_step_delay_ms),
            ..Self::default()
        }
    }

    /// Register one instance: build an operator model, apply the Hamiltonian
    /// (empty slice = none) and every Lindblad coordinate list, finalize,
    /// and store under the next sequential id.
    pub fn register(
        &mut self,
        dim: usize,
        h_packed: &[f64],
        lindblad_ops: &[Vec<f64>],
        qubit_count: usize,
    ) -> Result<usize> {
        validation::validate_registration(
            dim,
            qubit_count,
            h_packed.len(),
            self.instances.len(),
            &self.limits,
        )?;

        let mut model = OperatorModel::new();
        model.set_dimension(dim);
        if !h_packed.is_empty() {
            model.set_hamiltonian(h_packed);
        }
        for coords in lindblad_ops {
            if !coords.is_empty() {
                model.add_lindblad_coords(coords);
            }
        }
        model.finalize();

        let mut candidates = CandidateSet::new();
        candidates.set_epoch(model.finalize_epoch());

        let id = self.instances.len();
        self.instances.push(Instance {
            model,
            qubit_count,
            candidates,
        });

        info!(
            id,
            dim,
            qubit_count,
            lindblad_ops = lindblad_ops.len(),
            "registered evolution instance"
        );
        Ok(id)
    }

    /// Drop all instances and any in-flight sliced computation.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.sliced.reset();
    }

    /// Number of registered instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Qubit count of one instance.
    pub fn qubit_count(&self, id: usize) -> Option<usize> {
        self.instances.get(id).map(|i| i.qubit_count)
    }

    /// Explicitly drop one instance's screening candidates; the next
    /// adaptive pass rebuilds them.
    pub fn clear_candidates(&mut self, id: usize) {
        match self.instances.get_mut(id) {
            Some(inst) => inst.candidates.clear(),
            None => warn!(id, "clear_candidates on invalid instance id"),
        }
    }

    /// Deprecated compatibility knob: sleep inserted between eager units to
    /// spread CPU load. Never applied in the sliced path; prefer the sliced
    /// API.
    pub fn set_inter_step_delay(&mut self, delay: Duration) {
        self.inter_step_delay = delay;
    }

    /// Evolve every instance with a supplied initial state for `steps`
    /// steps, collecting the full per-step series.
    ///
    /// States beyond the registry size are ignored with a diagnostic;
    /// instances beyond the supplied list are not evolved.
    pub fn evolve_all(
        &mut self,
        states: &[Vec<f64>],
        steps: usize,
        dt: f64,
        max_dt: f64,
    ) -> Vec<InstanceSeries> {
        let mut count = states.len();
        if count > self.instances.len() {
            warn!(
                supplied = count,
                registered = self.instances.len(),
                "more states than registered instances; extras ignored"
            );
            count = self.instances.len();
        }
        let steps = self.clamp_steps(steps);

        let delay = self.inter_step_delay;
        (0..count)
            .map(|id| evolve_instance(&mut self.instances[id], &states[id], steps, dt, max_dt, delay))
            .collect()
    }

    /// Evolve a single instance; an invalid id yields an empty series with
    /// a diagnostic, never an error.
    pub fn evolve_one(
        &mut self,
        id: usize,
        state: &[f64],
        steps: usize,
        dt: f64,
        max_dt: f64,
    ) -> InstanceSeries {
        let steps = self.clamp_steps(steps);
        let delay = self.inter_step_delay;
        match self.instances.get_mut(id) {
            Some(inst) => evolve_instance(inst, state, steps, dt, max_dt, delay),
            None => {
                warn!(id, registered = self.instances.len(), "invalid instance id");
                InstanceSeries::default()
            }
        }
    }

    pub(crate) fn clamp_steps(&self, steps: usize) -> usize {
        if steps > self.limits.max_steps {
            warn!(
                steps,
                max = self.limits.max_steps,
                "step count exceeds limit; clamped"
            );
            self.limits.max_steps
        } else {
            steps
        }
    }
}

/// Eager per-instance driver: unpack, then run every unit back-to-back.
fn evolve_instance(
    inst: &mut Instance,
    state: &[f64],
    steps: usize,
    dt: f64,
    max_dt: f64,
    delay: Duration,
) -> InstanceSeries {
    let dim = inst.model.dimension();
    let Some(mut rho) = packed::unpack_dense(state, dim) else {
        warn!(
            expected = packed::dense_len(dim),
            actual = state.len(),
            "state shape does not match instance dimension; empty series"
        );
        return InstanceSeries::default();
    };
    refresh_candidates(inst);

    let mut series = InstanceSeries::default();
    for step in 0..steps {
        let (next, record) = advance_unit(inst, &rho, dt, max_dt, step == 0);
        series.push(record);
        rho = next;

        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    series
}

/// One (instance, step) unit: evolve, then derive Bloch, purity, and
/// mutual information from the evolved state. Shared verbatim by the eager
/// and sliced drivers so both produce identical results.
pub(crate) fn advance_unit(
    inst: &mut Instance,
    rho: &Array2<Complex64>,
    dt: f64,
    max_dt: f64,
    first_step: bool,
) -> (Array2<Complex64>, StepRecord) {
    let next = evolve::evolve(&inst.model, rho, dt, max_dt);

    let bloch = bloch_metrics(&next, inst.qubit_count);
    let state_purity = purity(&next);
    // Screening rescan on the first step of each run; candidate-only reuse
    // afterwards.
    let mutual_information = mutual_information_adaptive(
        &next,
        inst.qubit_count,
        state_purity,
        first_step,
        &mut inst.candidates,
    );

    let record = StepRecord {
        state: packed::pack_dense(&next),
        bloch,
        purity: state_purity,
        mutual_information,
    };
    (next, record)
}

/// Clear candidates screened against an outdated operator set.
pub(crate) fn refresh_candidates(inst: &mut Instance) {
    if inst.candidates.epoch() != inst.model.finalize_epoch() {
        inst.candidates.clear();
        inst.candidates.set_epoch(inst.model.finalize_epoch());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::bloch::BLOCH_STRIDE;
    use approx::assert_relative_eq;

    /// σ⁻ on qubit 0 of a 2-qubit register: entries (0,1) and (2,3).
    fn damping_q0_coords() -> Vec<f64> {
        vec![0.0, 1.0, 1.0, 0.0, 2.0, 3.0, 1.0, 0.0]
    }

    /// Qubit 0 maximally mixed, qubit 1 in |0⟩: diag(1/2, 1/2, 0, 0).
    fn mixed_q0_state() -> Vec<f64> {
        let mut state = vec![0.0; 32];
        state[0] = 0.5; // (0,0)
        state[10] = 0.5; // (1,1)
        state
    }

    fn register_damped(registry: &mut Registry) -> usize {
        registry
            .register(4, &[], &[damping_q0_coords()], 2)
            .unwrap()
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = Registry::new();
        assert_eq!(register_damped(&mut registry), 0);
        assert_eq!(register_damped(&mut registry), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.qubit_count(0), Some(2));
    }

    #[test]
    fn test_register_rejects_oversized_dimension() {
        let mut registry = Registry::with_limits(ResourceLimits {
            max_hilbert_dim: 4,
            ..Default::default()
        });
        assert!(registry.register(8, &[], &[], 3).is_err());
        assert!(registry.register(4, &[], &[], 2).is_ok());
    }

    #[test]
    fn test_register_rejects_bad_hamiltonian_shape() {
        let mut registry = Registry::new();
        assert!(registry.register(4, &[1.0, 0.0], &[], 2).is_err());
    }

    #[test]
    fn test_clear_drops_instances() {
        let mut registry = Registry::new();
        register_damped(&mut registry);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_evolve_one_invalid_id_is_empty() {
        let mut registry = Registry::new();
        register_damped(&mut registry);
        let series = registry.evolve_one(7, &mixed_q0_state(), 5, 0.1, 0.0);
        assert!(series.is_empty());
    }

    #[test]
    fn test_evolve_one_bad_state_shape_is_empty() {
        let mut registry = Registry::new();
        let id = register_damped(&mut registry);
        let series = registry.evolve_one(id, &[0.5, 0.0, 0.5], 5, 0.1, 0.0);
        assert!(series.is_empty());
    }

    #[test]
    fn test_evolve_all_ignores_extra_states() {
        let mut registry = Registry::new();
        register_damped(&mut registry);
        let states = vec![mixed_q0_state(), mixed_q0_state(), mixed_q0_state()];
        let results = registry.evolve_all(&states, 3, 0.1, 0.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].len(), 3);
    }

    #[test]
    fn test_series_shapes() {
        let mut registry = Registry::new();
        let id = register_damped(&mut registry);
        let series = registry.evolve_one(id, &mixed_q0_state(), 4, 0.1, 0.0);

        assert_eq!(series.len(), 4);
        for step in 0..4 {
            assert_eq!(series.states[step].len(), 32);
            assert_eq!(series.bloch[step].len(), 2 * BLOCH_STRIDE);
            assert_eq!(series.mutual_information[step].len(), 1);
        }
        assert!(series.final_mutual_information().is_some());
    }

    #[test]
    fn test_amplitude_damping_end_to_end() {
        // Registered 2-qubit instance, H = 0, one Lindblad operator driving
        // qubit 0 toward |0⟩. Over 50 small steps the reduced qubit-0 state
        // must approach a pure |0⟩: Bloch radius (hence reduced purity)
        // rises monotonically and p1 falls to ~0.
        let mut registry = Registry::new();
        let id = register_damped(&mut registry);
        let series = registry.evolve_one(id, &mixed_q0_state(), 50, 0.1, 0.0);
        assert_eq!(series.len(), 50);

        let mut last_r = -1.0;
        let mut last_p1 = 2.0;
        for step in 0..50 {
            let r = series.bloch[step][5];
            let p1 = series.bloch[step][1];
            assert!(r >= last_r - 1e-12, "Bloch radius must grow, step {step}");
            assert!(p1 <= last_p1 + 1e-12, "p1 must shrink, step {step}");
            last_r = r;
            last_p1 = p1;
        }
        assert!(last_p1 < 0.01, "p1 should approach 0, got {last_p1}");
        assert!(last_r > 0.99, "qubit 0 should purify, got r = {last_r}");

        // Qubit 1 is untouched: stays in |0⟩
        let q1_base = BLOCH_STRIDE;
        assert_relative_eq!(series.bloch[49][q1_base], 1.0, epsilon = 1e-9);

        // Full-state purity climbs toward 1 as well
        assert!(series.purity[49] > 0.98);
        assert!(series.purity[49] >= series.purity[0]);
    }

    #[test]
    fn test_uncorrelated_instance_reports_zero_mi() {
        let mut registry = Registry::new();
        let id = register_damped(&mut registry);
        let series = registry.evolve_one(id, &mixed_q0_state(), 5, 0.1, 0.0);
        for mi in &series.mutual_information {
            assert_relative_eq!(mi[0], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_max_dt_wins_over_dt() {
        let mut registry = Registry::new();
        let id = register_damped(&mut registry);
        let with_max = registry.evolve_one(id, &mixed_q0_state(), 10, 99.0, 0.1);
        let with_dt = registry.evolve_one(id, &mixed_q0_state(), 10, 0.1, 0.0);
        assert_eq!(with_max, with_dt);
    }

    #[test]
    fn test_steps_clamped_to_limit() {
        let mut registry = Registry::with_limits(ResourceLimits {
            max_steps: 3,
            ..Default::default()
        });
        let id = register_damped(&mut registry);
        let series = registry.evolve_one(id, &mixed_q0_state(), 10, 0.1, 0.0);
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_clear_candidates_invalid_id_is_noop() {
        let mut registry = Registry::new();
        registry.clear_candidates(3);
    }
}
