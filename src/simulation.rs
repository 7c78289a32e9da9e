//! Engine owning every Sim: ladder construction and the per-frame step.

use crate::config::{BendPolicy, SimulationConfig};
use crate::constraint::DistanceConstraint;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::sim::{Sim, SimId, SimState};
use crate::vec::Vec2;
use alloc::collections::BTreeMap;
use alloc::vec::Vec as AllocVec;

/// Bend of a segment in degrees: the unsigned angle between its `heading`
/// and the Sim's reference heading, in `[0, 180]`.
pub fn deform_angle<F: Float>(orientation: F, heading: F) -> F {
    (heading - orientation).wrap_degrees().abs()
}

/// Collection of independent strips, addressed by stable [`SimId`]s.
///
/// Ids are slot indices into an append-only vector; removal leaves an
/// [`SimState::Empty`] tombstone and the id is never handed out again.
pub struct Simulation<F: Float> {
    simulations: AllocVec<Sim<F>>,
    pub config: SimulationConfig<F>,
}

impl<F: Float> Simulation<F> {
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::new())
    }

    pub fn with_config(config: SimulationConfig<F>) -> Self {
        Simulation {
            simulations: AllocVec::new(),
            config,
        }
    }

    // segment layout:
    //
    //  (2)------(3)    (0)----(2)----
    //   |      / |      |    / |
    //   |    /   |      |  /   |
    //  (0)------(1)    (1)----(3)----
    //   top/bottom      left/right
    fn build_geom(
        &mut self,
        sim_id: SimId,
        starting: Vec2<F>,
        opposite: Vec2<F>,
        steps: &[Vec2<F>],
        stiffness: F,
        variation: bool,
    ) {
        let variation_change = self.config.variation_change;
        let sim = &mut self.simulations[sim_id];
        sim.clear();
        sim.particles.reserve(2 * (steps.len() + 1));
        sim.constraints.reserve(4 * steps.len());

        let mut mass = F::one();
        let mut stiffness = stiffness;

        sim.particles.push(Particle::fixed(starting));
        sim.particles.push(Particle::fixed(starting + opposite));
        let (mut p1, mut p2) = (0, 1);

        for step in steps {
            let n1 = sim.particles.len();
            let n2 = n1 + 1;
            let pos1 = sim.particles[p1].position + *step;
            let pos2 = sim.particles[p2].position + *step;
            sim.particles.push(Particle::new(pos1, mass));
            sim.particles.push(Particle::new(pos2, mass));

            let particles = &sim.particles;
            // rails, cross brace, then the shear diagonal
            for (a, b) in [(p1, n1), (p2, n2), (n1, n2), (p1, n2)] {
                sim.constraints.push(DistanceConstraint::from_particles(
                    sim_id, a, b, particles, stiffness,
                ));
            }

            p1 = n1;
            p2 = n2;

            if variation {
                mass = mass * variation_change;
                stiffness = stiffness * variation_change;
            }
        }
    }

    /// Append a new Running Sim and build its ladder. Returns its id.
    pub fn make_geom(
        &mut self,
        orientation: F,
        starting: Vec2<F>,
        opposite: Vec2<F>,
        steps: &[Vec2<F>],
        stiffness: F,
        variation: bool,
    ) -> SimId {
        let sim_id = self.simulations.len();
        self.simulations.push(Sim::new(SimState::Running, orientation));
        self.build_geom(sim_id, starting, opposite, steps, stiffness, variation);
        log::debug!("built sim {} with {} segments", sim_id, steps.len());
        sim_id
    }

    /// Rebuild an existing Sim in place. Running/Paused state is kept; a
    /// removed Sim comes back Running.
    ///
    /// # Panics
    /// Panics if `sim_id` was never allocated.
    #[allow(clippy::too_many_arguments)]
    pub fn update_geom(
        &mut self,
        sim_id: SimId,
        orientation: F,
        starting: Vec2<F>,
        opposite: Vec2<F>,
        steps: &[Vec2<F>],
        stiffness: F,
        variation: bool,
    ) {
        let sim = &mut self.simulations[sim_id];
        if sim.state == SimState::Empty {
            sim.state = SimState::Running;
        }
        sim.orientation = orientation;
        self.build_geom(sim_id, starting, opposite, steps, stiffness, variation);
        log::debug!("rebuilt sim {} with {} segments", sim_id, steps.len());
    }

    /// Tombstone a Sim.
    ///
    /// # Panics
    /// Panics if `sim_id` was never allocated.
    pub fn remove_geom(&mut self, sim_id: SimId) {
        self.simulations[sim_id] = Sim::empty();
        log::debug!("removed sim {}", sim_id);
    }

    /// Advance every Running Sim by `delta` under one uniform `force`.
    pub fn simulate<O: StepObserver>(&mut self, delta: F, force: Vec2<F>, observer: &mut O) {
        self.advance(delta, |_| force, observer);
    }

    /// Advance every Running Sim by `delta`, each under its own force.
    /// Sims missing from `forces` step under zero force.
    pub fn simulate_each<O: StepObserver>(
        &mut self,
        delta: F,
        forces: &BTreeMap<SimId, Vec2<F>>,
        observer: &mut O,
    ) {
        self.advance(
            delta,
            |id| forces.get(&id).copied().unwrap_or_else(Vec2::zero),
            observer,
        );
    }

    fn advance<O, P>(&mut self, delta: F, force_of: P, observer: &mut O)
    where
        O: StepObserver,
        P: Fn(SimId) -> Vec2<F>,
    {
        let config = &self.config;
        for (sim_id, sim) in self.simulations.iter_mut().enumerate() {
            if !sim.is_running() {
                continue;
            }
            step_sim(sim_id, sim, delta, force_of(sim_id), config, observer);
            observer.on_sim_complete(sim_id);
        }
        observer.on_step_complete();
    }

    /// Snap every particle of every Sim back to rest.
    pub fn reset(&mut self) {
        for sim in self.simulations.iter_mut() {
            sim.reset();
        }
    }

    /// Number of allocated slots, removed ones included.
    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn sims(&self) -> &[Sim<F>] {
        &self.simulations
    }

    pub fn sim(&self, sim_id: SimId) -> Option<&Sim<F>> {
        self.simulations.get(sim_id)
    }

    pub fn sim_mut(&mut self, sim_id: SimId) -> Option<&mut Sim<F>> {
        self.simulations.get_mut(sim_id)
    }
}

impl<F: Float> Default for Simulation<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// One frame of one Sim: a single constraint pass, then the rail pairs are
/// integrated root to tip with the bend check in between.
fn step_sim<F: Float, O: StepObserver>(
    sim_id: SimId,
    sim: &mut Sim<F>,
    delta: F,
    force: Vec2<F>,
    config: &SimulationConfig<F>,
    observer: &mut O,
) {
    let Sim { orientation, particles, constraints, .. } = sim;

    for c in constraints.iter() {
        c.resolve(particles);
    }
    observer.on_constraints_resolved(sim_id);

    let count = particles.len();
    if count < 4 {
        return;
    }

    for p in (0..count - 2).step_by(2) {
        let segment = p / 2;
        let base = particles[p].position.midpoint(particles[p + 1].position);
        let next = particles[p + 2].position.midpoint(particles[p + 3].position);
        let deform = deform_angle(*orientation, (next - base).angle().to_degrees());
        let is_tip = p == count - 4;

        let step_delta = match config.bend_policy {
            BendPolicy::SoftSlowdown => {
                if deform > config.reset_angle {
                    particles[p].reset();
                    particles[p + 1].reset();
                    log::trace!("sim {}: segment {} reset at {} deg", sim_id, segment, deform);
                    observer.on_segment_reset(sim_id, segment, deform.to_f32());
                }
                if deform > config.angle_limit {
                    delta * config.slowdown
                } else {
                    delta
                }
            }
            BendPolicy::HardFreeze => {
                if deform >= config.angle_limit {
                    log::trace!("sim {}: frozen from segment {} at {} deg", sim_id, segment, deform);
                    observer.on_chain_frozen(sim_id, segment, deform.to_f32());
                    break;
                }
                delta
            }
        };

        particles[p].simulate(step_delta, force);
        particles[p + 1].simulate(step_delta, force);
        if is_tip {
            particles[p + 2].simulate(step_delta, force);
            particles[p + 3].simulate(step_delta, force);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deform_angle_is_zero_along_each_anchor_heading() {
        // bottom anchor grows up, top anchor grows down
        assert!(deform_angle(-90.0f64, -90.0).abs() < 1e-9);
        assert!(deform_angle(90.0f64, 90.0).abs() < 1e-9);
        assert!(deform_angle(0.0f64, 0.0).abs() < 1e-9);
        assert!(deform_angle(-180.0f64, 180.0).abs() < 1e-9);
        assert!(deform_angle(-180.0f64, -180.0).abs() < 1e-9);
    }

    #[test]
    fn deform_angle_measures_tilt() {
        assert!((deform_angle(-90.0f64, -60.0) - 30.0).abs() < 1e-9);
        assert!((deform_angle(-90.0f64, -120.0) - 30.0).abs() < 1e-9);
        assert!((deform_angle(0.0f64, -45.0) - 45.0).abs() < 1e-9);
        assert!((deform_angle(-180.0f64, 170.0) - 10.0).abs() < 1e-9);
        assert!((deform_angle(-90.0f64, 0.0) - 90.0).abs() < 1e-9);
        assert!((deform_angle(90.0f64, 135.0) - 45.0).abs() < 1e-9);
    }

    #[test]
    fn deform_angle_sees_folds_on_vertical_strips() {
        // bottom strip folded straight back down
        assert!((deform_angle(-90.0f64, 90.0) - 180.0).abs() < 1e-9);
        assert!((deform_angle(-90.0f64, 30.0) - 120.0).abs() < 1e-9);
        // top strip folded back up
        assert!((deform_angle(90.0f64, -90.0) - 180.0).abs() < 1e-9);
        assert!((deform_angle(90.0f64, -30.0) - 120.0).abs() < 1e-9);
    }

    fn ladder(sim: &mut Simulation<f64>, segments: usize, variation: bool) -> SimId {
        let steps = alloc::vec![Vec2::new(0.0, -10.0); segments];
        sim.make_geom(-90.0, Vec2::new(0.0, 40.0), Vec2::new(20.0, 0.0), &steps, 0.5, variation)
    }

    #[test]
    fn ladder_topology() {
        let mut sim = Simulation::new();
        let id = ladder(&mut sim, 3, false);
        let s = sim.sim(id).unwrap();
        assert_eq!(s.particles.len(), 8);
        assert_eq!(s.constraints.len(), 12);
        assert_eq!(s.segment_count(), 3);
        assert!(s.particles[0].fixed && s.particles[1].fixed);
        assert!(s.particles[2..].iter().all(|p| !p.fixed));

        let c = &s.constraints[4..8];
        assert_eq!((c[0].a, c[0].b), (2, 4));
        assert_eq!((c[1].a, c[1].b), (3, 5));
        assert_eq!((c[2].a, c[2].b), (4, 5));
        assert_eq!((c[3].a, c[3].b), (2, 5));
        assert!(c.iter().all(|c| c.sim_id == id));
        assert!((c[3].target - (10.0f64 * 10.0 + 20.0 * 20.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn variation_decays_mass_and_stiffness() {
        let mut sim = Simulation::new();
        let id = ladder(&mut sim, 3, true);
        let s = sim.sim(id).unwrap();
        let masses: AllocVec<f64> = s.particles.iter().skip(2).step_by(2).map(|p| p.mass).collect();
        assert!((masses[0] - 1.0).abs() < 1e-12);
        assert!((masses[1] - 0.4).abs() < 1e-12);
        assert!((masses[2] - 0.16).abs() < 1e-12);
        assert!(s.constraints[4].stiffness < s.constraints[0].stiffness);
    }

    #[test]
    fn hard_freeze_stops_at_first_bent_segment() {
        let mut sim: Simulation<f64> = Simulation::with_config(
            SimulationConfig::new().with_bend_policy(BendPolicy::HardFreeze),
        );
        let id = ladder(&mut sim, 3, false);
        {
            let s = sim.sim_mut(id).unwrap();
            // kink the last segment sideways
            s.particles[6].position = Vec2::new(30.0, 15.0);
            s.particles[7].position = Vec2::new(50.0, 15.0);
            s.constraints.clear();
        }
        let before: AllocVec<Vec2<f64>> =
            sim.sim(id).unwrap().particles.iter().map(|p| p.position).collect();

        sim.simulate(0.1, Vec2::new(10.0, 0.0), &mut crate::observer::NoOpStepObserver);

        let after = &sim.sim(id).unwrap().particles;
        // pairs before the kink integrate, the kinked segment and the tip do not
        assert!((after[2].position.x - 0.1).abs() < 1e-9);
        assert!((after[3].position.x - 20.1).abs() < 1e-9);
        for i in 4..8 {
            assert_eq!(after[i].position, before[i]);
        }
    }
}
