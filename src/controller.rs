//! Per-frame driver around an [`ElasticSimulation`].

use crate::elastic::ElasticSimulation;
use crate::error::SimulationError;
use crate::float::Float;
use crate::modulation::{ForceModulator, StaticModulation};
use crate::sim::SimId;
use crate::vec::Vec2;
use alloc::collections::BTreeMap;

/// Fixed step used per `progress` call. Finer steps bend more slowly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Precision {
    Low,
    #[default]
    Medium,
    High,
}

impl Precision {
    pub fn delta<F: Float>(self) -> F {
        match self {
            Precision::Low => F::from_f32(0.1),
            Precision::Medium => F::from_f32(0.05),
            Precision::High => F::from_f32(0.01),
        }
    }
}

/// Drives one shared [`ElasticSimulation`] for many strips.
///
/// Every strip feels the same `force` while the modulator is inactive. Once
/// it is active, stepping switches to per-strip forces: modulated strips get
/// `force * modulation(sim_id, time_progress)` component-wise and the rest
/// get none.
pub struct SimulationController<F: Float, M: ForceModulator<F> = StaticModulation<F>> {
    sim: ElasticSimulation<F>,
    modulator: M,
    paused: bool,
    precision: Precision,
    force: Vec2<F>,
    time_scale: F,
    time_progress: F,
}

impl<F: Float> SimulationController<F> {
    /// A paused controller with medium precision, a `(10, 10)` force and no
    /// modulation.
    pub fn new() -> Self {
        Self::with_simulation(ElasticSimulation::new())
    }

    pub fn with_simulation(sim: ElasticSimulation<F>) -> Self {
        Self::with_modulator(sim, BTreeMap::new())
    }

    /// Scale the force felt by one strip. The strip must exist.
    pub fn set_modulation(
        &mut self,
        sim_id: SimId,
        modulation: Vec2<F>,
    ) -> Result<(), SimulationError> {
        if sim_id >= self.sim.sim_count() {
            let err = SimulationError::SimOutOfBounds { id: sim_id, count: self.sim.sim_count() };
            log::warn!("modulation: {}", err);
            return Err(err);
        }
        self.modulator.insert(sim_id, modulation);
        Ok(())
    }

    pub fn clear_modulation(&mut self, sim_id: SimId) {
        self.modulator.remove(&sim_id);
    }
}

impl<F: Float, M: ForceModulator<F>> SimulationController<F, M> {
    pub fn with_modulator(sim: ElasticSimulation<F>, modulator: M) -> Self {
        SimulationController {
            sim,
            modulator,
            paused: true,
            precision: Precision::default(),
            force: Vec2::new(F::from_f32(10.0), F::from_f32(10.0)),
            time_scale: F::from_f32(10.0),
            time_progress: F::zero(),
        }
    }

    pub fn simulation(&self) -> &ElasticSimulation<F> {
        &self.sim
    }

    pub fn simulation_mut(&mut self) -> &mut ElasticSimulation<F> {
        &mut self.sim
    }

    pub fn modulator(&self) -> &M {
        &self.modulator
    }

    pub fn modulator_mut(&mut self) -> &mut M {
        &mut self.modulator
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn set_force(&mut self, force: Vec2<F>) {
        self.force = force;
    }

    pub fn force(&self) -> Vec2<F> {
        self.force
    }

    /// How fast modulation time runs relative to frame time.
    pub fn set_time_scale(&mut self, scale: F) {
        self.time_scale = scale;
    }

    pub fn time_scale(&self) -> F {
        self.time_scale
    }

    /// Modulation time: frame time accumulated by `progress`, multiplied by
    /// `time_scale`.
    pub fn time_progress(&self) -> F {
        self.time_progress
    }

    /// Force currently applied to `sim_id`.
    pub fn force_for(&self, sim_id: SimId) -> Vec2<F> {
        if !self.modulator.is_active() {
            return self.force;
        }
        self.modulator
            .modulation(sim_id, self.time_progress)
            .map(|m| m.component_mul(self.force))
            .unwrap_or_else(Vec2::zero)
    }

    /// Advance one fixed step unless paused. Returns whether the controller
    /// advanced.
    ///
    /// `delta` is the frame time; it only feeds `time_progress`, the
    /// physics always steps by the precision's fixed delta. With an active
    /// modulator that covers none of the allocated strips nothing steps.
    pub fn progress(&mut self, delta: F) -> Result<bool, SimulationError> {
        if self.paused {
            return Ok(false);
        }
        let step = self.precision.delta();
        if self.modulator.is_active() {
            let forces = self.modulated_forces();
            if !forces.is_empty() {
                self.sim.simulate(step, &forces)?;
            }
        } else {
            self.sim.simulate_all(step, self.force);
        }
        self.time_progress = self.time_progress + delta * self.time_scale;
        Ok(true)
    }

    /// Snap every strip back to rest.
    pub fn reset(&mut self) {
        self.sim.reset_sim();
    }

    fn modulated_forces(&self) -> BTreeMap<SimId, Vec2<F>> {
        (0..self.sim.sim_count())
            .filter_map(|id| {
                self.modulator
                    .modulation(id, self.time_progress)
                    .map(|m| (id, m.component_mul(self.force)))
            })
            .collect()
    }
}

impl<F: Float> Default for SimulationController<F> {
    fn default() -> Self {
        Self::new()
    }
}
