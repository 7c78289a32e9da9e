//! Verlet particles for the elastic strip.

use crate::float::Float;
use crate::vec::Vec2;

/// A Verlet particle: position-based dynamics with implicit velocity.
///
/// Velocity lives in `position - previous`; there is no damping term, so
/// energy only leaves the system through constraint corrections and the
/// bend check in [`Simulation`](crate::simulation::Simulation).
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub fixed: bool,
    pub rest: Vec2<F>,
    pub position: Vec2<F>,
    pub previous: Vec2<F>,
    /// Scales the applied force. Decays along the strip when size variation
    /// is enabled.
    pub mass: F,
}

impl<F: Float> Particle<F> {
    /// A free particle at rest at `pos`.
    pub fn new(pos: Vec2<F>, mass: F) -> Self {
        Particle {
            fixed: false,
            rest: pos,
            position: pos,
            previous: pos,
            mass,
        }
    }

    /// An anchored particle. It never moves after creation.
    pub fn fixed(pos: Vec2<F>) -> Self {
        Particle {
            fixed: true,
            rest: pos,
            position: pos,
            previous: pos,
            mass: F::one(),
        }
    }

    /// Positional correction from a constraint.
    pub fn correct(&mut self, v: Vec2<F>) {
        if !self.fixed {
            self.position += v;
        }
    }

    /// One Störmer-Verlet step under `force`.
    pub fn simulate(&mut self, delta: F, force: Vec2<F>) {
        if self.fixed {
            return;
        }
        let acceleration = force.scale(self.mass * delta * delta);
        let next = self.position.scale(F::two()) - self.previous + acceleration;
        self.previous = self.position;
        self.position = next;
    }

    /// Snap back to the rest position with zero velocity.
    pub fn reset(&mut self) {
        self.position = self.rest;
        self.previous = self.rest;
    }
}
