//! One simulation slot: a two-rail particle ladder and its constraints.

use crate::constraint::DistanceConstraint;
use crate::float::Float;
use crate::particle::Particle;
use alloc::vec::Vec as AllocVec;

/// Stable handle of a Sim inside a [`Simulation`](crate::simulation::Simulation).
pub type SimId = usize;

/// Internal run state of a Sim.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimState {
    Running,
    Paused,
    /// Tombstone left by removal. The slot and its id stay allocated.
    Empty,
}

/// A single strip.
///
/// Particles are laid out in rail pairs: `[0, 1]` is the fixed root, each
/// following pair `[2k, 2k + 1]` is the far edge of segment `k - 1`.
#[derive(Clone, Debug)]
pub struct Sim<F: Float> {
    pub state: SimState,
    /// Reference heading in degrees: `-90` for bottom anchored strips, `90`
    /// for top anchored, `0` for left anchored and `-180` for right anchored
    /// ones.
    pub orientation: F,
    pub particles: AllocVec<Particle<F>>,
    pub constraints: AllocVec<DistanceConstraint<F>>,
}

impl<F: Float> Sim<F> {
    pub fn new(state: SimState, orientation: F) -> Self {
        Sim {
            state,
            orientation,
            particles: AllocVec::new(),
            constraints: AllocVec::new(),
        }
    }

    /// A removed slot.
    pub fn empty() -> Self {
        Self::new(SimState::Empty, F::zero())
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    /// Number of quad segments (rail pairs past the root).
    pub fn segment_count(&self) -> usize {
        (self.particles.len() / 2).saturating_sub(1)
    }

    /// Drop geometry, keeping state and orientation.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.constraints.clear();
    }

    pub fn reset(&mut self) {
        for p in self.particles.iter_mut() {
            p.reset();
        }
    }
}
