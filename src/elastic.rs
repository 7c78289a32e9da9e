//! Public facade: declarative strip creation, state control, force
//! application and read-back for rendering.

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::float::Float;
use crate::geometry::{Anchor, StripGeometry};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::Particle;
use crate::sim::{Sim, SimId, SimState};
use crate::simulation::Simulation;
use crate::vec::{Size2, Vec2};
use alloc::collections::BTreeMap;
use alloc::vec::Vec as AllocVec;

/// Externally visible run state of a strip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    Removed,
}

impl From<SimState> for State {
    fn from(state: SimState) -> Self {
        match state {
            SimState::Running => State::Running,
            SimState::Paused => State::Paused,
            SimState::Empty => State::Removed,
        }
    }
}

/// Snapshot of one constraint for debug drawing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ConstraintView<F: Float> {
    pub begin: Vec2<F>,
    pub end: Vec2<F>,
    /// Stretch in `[-1, 1]`: `-1` at 80% of rest length or shorter, `1` at
    /// 120% or longer.
    pub deviation: F,
}

/// Owns a [`Simulation`] and translates "bend an `N` segment strip over this
/// rectangle, pinned at this side" into engine geometry.
///
/// ```
/// use elastica::{Anchor, ElasticSimulation, Size2, Vec2};
///
/// let mut sim: ElasticSimulation<f32> = ElasticSimulation::new();
/// let id = sim
///     .make_sim(Size2::new(100.0, 50.0), 4, false, Anchor::Bottom, 0.5, false)
///     .unwrap();
/// sim.simulate_all(1.0 / 60.0, Vec2::new(10.0, 0.0));
/// assert_eq!(sim.get_sim_particles_count(id), 10);
/// ```
pub struct ElasticSimulation<F: Float> {
    sim: Simulation<F>,
    time_passed: F,
}

impl<F: Float> ElasticSimulation<F> {
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::new())
    }

    pub fn with_config(config: SimulationConfig<F>) -> Self {
        ElasticSimulation {
            sim: Simulation::with_config(config),
            time_passed: F::zero(),
        }
    }

    pub fn config(&self) -> &SimulationConfig<F> {
        &self.sim.config
    }

    pub fn config_mut(&mut self) -> &mut SimulationConfig<F> {
        &mut self.sim.config
    }

    /// Build a new strip and return its id.
    ///
    /// `stiffness_factor` is expected in `[0, 1]`; larger values are clamped.
    pub fn make_sim(
        &mut self,
        rect: Size2<F>,
        segments: usize,
        dynamic_split: bool,
        anchor: Anchor,
        stiffness_factor: F,
        variation: bool,
    ) -> Result<SimId, SimulationError> {
        let geom = validated_geometry(rect, segments, dynamic_split, anchor, stiffness_factor)?;
        Ok(self.sim.make_geom(
            geom.orientation,
            geom.starting,
            geom.opposite,
            &geom.steps,
            stiffness_factor,
            variation,
        ))
    }

    /// Rebuild strip `sim_id` in place. Nothing changes on error.
    #[allow(clippy::too_many_arguments)]
    pub fn update_sim(
        &mut self,
        sim_id: SimId,
        rect: Size2<F>,
        segments: usize,
        dynamic_split: bool,
        anchor: Anchor,
        stiffness_factor: F,
        variation: bool,
    ) -> Result<(), SimulationError> {
        self.try_sim(sim_id)?;
        let geom = validated_geometry(rect, segments, dynamic_split, anchor, stiffness_factor)?;
        self.sim.update_geom(
            sim_id,
            geom.orientation,
            geom.starting,
            geom.opposite,
            &geom.steps,
            stiffness_factor,
            variation,
        );
        Ok(())
    }

    /// Pause or resume a strip. `Removed` cannot be assigned; use
    /// [`remove_sim`](Self::remove_sim).
    pub fn set_sim_state(&mut self, sim_id: SimId, state: State) -> Result<(), SimulationError> {
        let current = self.try_sim(sim_id)?.state;
        let next = match (current, state) {
            (SimState::Empty, _) | (_, State::Removed) => {
                log::warn!("cannot set sim {} from {:?} to {:?}", sim_id, current, state);
                return Err(SimulationError::InvalidState);
            }
            (_, State::Running) => SimState::Running,
            (_, State::Paused) => SimState::Paused,
        };
        if let Some(sim) = self.sim.sim_mut(sim_id) {
            sim.state = next;
        }
        Ok(())
    }

    pub fn get_sim_state(&self, sim_id: SimId) -> Result<State, SimulationError> {
        self.try_sim(sim_id).map(|sim| sim.state.into())
    }

    /// Tombstone a strip. Its id is never reused.
    pub fn remove_sim(&mut self, sim_id: SimId) -> Result<(), SimulationError> {
        self.try_sim(sim_id)?;
        self.sim.remove_geom(sim_id);
        Ok(())
    }

    /// Snap every particle of every strip, paused and removed included,
    /// back to rest.
    pub fn reset_sim(&mut self) {
        self.sim.reset();
    }

    pub fn get_sim_particles_count(&self, sim_id: SimId) -> usize {
        self.try_sim(sim_id).map(|sim| sim.particles.len()).unwrap_or(0)
    }

    pub fn get_sim_particle_pos(&self, sim_id: SimId, index: usize) -> Vec2<F> {
        self.try_particle(sim_id, index)
            .map(|p| p.position)
            .unwrap_or_else(|_| Vec2::zero())
    }

    pub fn get_sim_particle_mass(&self, sim_id: SimId, index: usize) -> F {
        self.try_particle(sim_id, index)
            .map(|p| p.mass)
            .unwrap_or_else(|_| F::zero())
    }

    pub fn is_sim_particle_fixed(&self, sim_id: SimId, index: usize) -> bool {
        self.try_particle(sim_id, index).map(|p| p.fixed).unwrap_or(false)
    }

    pub fn get_sim_constraint_count(&self, sim_id: SimId) -> usize {
        self.try_sim(sim_id).map(|sim| sim.constraints.len()).unwrap_or(0)
    }

    pub fn get_sim_constraint_at(&self, sim_id: SimId, index: usize) -> ConstraintView<F> {
        self.try_constraint(sim_id, index).unwrap_or_default()
    }

    /// Advance every Running strip under one uniform force.
    pub fn simulate_all(&mut self, delta: F, force: Vec2<F>) {
        self.simulate_all_observed(delta, force, &mut NoOpStepObserver);
    }

    pub fn simulate_all_observed<O: StepObserver>(
        &mut self,
        delta: F,
        force: Vec2<F>,
        observer: &mut O,
    ) {
        self.time_passed = self.time_passed + delta;
        self.sim.simulate(delta, force, observer);
    }

    /// Advance every Running strip, each under its own force. Strips missing
    /// from `forces` still step, under zero force.
    ///
    /// Fails without stepping anything if `forces` names an unallocated id.
    pub fn simulate(
        &mut self,
        delta: F,
        forces: &BTreeMap<SimId, Vec2<F>>,
    ) -> Result<(), SimulationError> {
        self.simulate_observed(delta, forces, &mut NoOpStepObserver)
    }

    pub fn simulate_observed<O: StepObserver>(
        &mut self,
        delta: F,
        forces: &BTreeMap<SimId, Vec2<F>>,
        observer: &mut O,
    ) -> Result<(), SimulationError> {
        if let Some((&id, _)) = forces.range(self.sim.len()..).next() {
            return Err(self.out_of_bounds(id));
        }
        self.time_passed = self.time_passed + delta;
        self.sim.simulate_each(delta, forces, observer);
        Ok(())
    }

    /// Simulated time accumulated over all stepping calls.
    pub fn time_passed(&self) -> F {
        self.time_passed
    }

    /// Number of ids handed out so far, removed ones included.
    pub fn sim_count(&self) -> usize {
        self.sim.len()
    }

    pub fn sim(&self, sim_id: SimId) -> Option<&Sim<F>> {
        self.sim.sim(sim_id)
    }

    /// All particle positions of a strip, in rail-pair order.
    pub fn sim_particle_positions(&self, sim_id: SimId) -> AllocVec<Vec2<F>> {
        self.sim
            .sim(sim_id)
            .map(|sim| sim.particles.iter().map(|p| p.position).collect())
            .unwrap_or_default()
    }

    /// Snapshots of all constraints of a strip.
    pub fn sim_constraints(&self, sim_id: SimId) -> AllocVec<ConstraintView<F>> {
        self.sim
            .sim(sim_id)
            .map(|sim| sim.constraints.iter().map(|c| view(c, &sim.particles)).collect())
            .unwrap_or_default()
    }

    fn out_of_bounds(&self, id: SimId) -> SimulationError {
        let err = SimulationError::SimOutOfBounds { id, count: self.sim.len() };
        log::warn!("{}", err);
        err
    }

    fn try_sim(&self, sim_id: SimId) -> Result<&Sim<F>, SimulationError> {
        self.sim.sim(sim_id).ok_or_else(|| self.out_of_bounds(sim_id))
    }

    fn try_particle(&self, sim_id: SimId, index: usize) -> Result<&Particle<F>, SimulationError> {
        let sim = self.try_sim(sim_id)?;
        sim.particles.get(index).ok_or_else(|| {
            let err = SimulationError::IndexOutOfBounds { index, count: sim.particles.len() };
            log::warn!("sim {}: particle {}", sim_id, err);
            err
        })
    }

    fn try_constraint(&self, sim_id: SimId, index: usize) -> Result<ConstraintView<F>, SimulationError> {
        let sim = self.try_sim(sim_id)?;
        match sim.constraints.get(index) {
            Some(c) => Ok(view(c, &sim.particles)),
            None => {
                let err = SimulationError::IndexOutOfBounds { index, count: sim.constraints.len() };
                log::warn!("sim {}: constraint {}", sim_id, err);
                Err(err)
            }
        }
    }
}

impl<F: Float> Default for ElasticSimulation<F> {
    fn default() -> Self {
        Self::new()
    }
}

fn view<F: Float>(
    c: &crate::constraint::DistanceConstraint<F>,
    particles: &[Particle<F>],
) -> ConstraintView<F> {
    let (begin, end) = c.endpoints(particles);
    ConstraintView {
        begin,
        end,
        deviation: c.deviation(particles),
    }
}

fn validated_geometry<F: Float>(
    rect: Size2<F>,
    segments: usize,
    dynamic_split: bool,
    anchor: Anchor,
    stiffness_factor: F,
) -> Result<StripGeometry<F>, SimulationError> {
    if segments == 0 {
        log::warn!("rejected strip with no segments");
        return Err(SimulationError::InvalidSegments(segments));
    }
    if !stiffness_factor.is_finite() || stiffness_factor < F::zero() {
        log::warn!("rejected stiffness factor {}", stiffness_factor);
        return Err(SimulationError::InvalidStiffness);
    }
    if stiffness_factor > F::one() {
        log::warn!("stiffness factor {} clamped to 1", stiffness_factor);
    }

    if !rect.width.is_finite() || !rect.height.is_finite() || anchor.length_of(rect) <= F::zero() {
        log::warn!("rejected rect {:?} for {:?} anchor", rect, anchor);
        return Err(SimulationError::DegenerateGeometry);
    }
    let geom = StripGeometry::new(rect, segments, dynamic_split, anchor);
    if geom.is_degenerate() {
        log::warn!("rejected degenerate rect {:?} for {:?} anchor", rect, anchor);
        return Err(SimulationError::DegenerateGeometry);
    }
    Ok(geom)
}
