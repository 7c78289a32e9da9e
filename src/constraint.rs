//! Distance constraints holding the strip's quads together.

use crate::float::Float;
use crate::particle::Particle;
use crate::sim::SimId;
use crate::vec::Vec2;

/// Lower end of the stiffness band a `[0, 1]` factor is mapped into.
pub const MIN_DIST_STIFFNESS: f32 = 0.4;
/// Upper end of the stiffness band.
pub const MAX_DIST_STIFFNESS: f32 = 0.7;

/// Below this length a constraint has no usable direction and is skipped.
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Linear spring between two particles of one Sim, by index.
#[derive(Clone, Debug)]
pub struct DistanceConstraint<F: Float> {
    pub sim_id: SimId,
    pub a: usize,
    pub b: usize,
    /// Rest distance, fixed at construction.
    pub target: F,
    pub stiffness: F,
}

impl<F: Float> DistanceConstraint<F> {
    /// Build a constraint whose target is the current distance between
    /// `particles[a]` and `particles[b]`.
    ///
    /// `factor` is clamped to `[0, 1]` and mapped onto
    /// `[MIN_DIST_STIFFNESS, MAX_DIST_STIFFNESS]`.
    pub fn from_particles(
        sim_id: SimId,
        a: usize,
        b: usize,
        particles: &[Particle<F>],
        factor: F,
    ) -> Self {
        let target = particles[a].position.distance(particles[b].position);
        DistanceConstraint {
            sim_id,
            a,
            b,
            target,
            stiffness: stiffness_from_factor(factor),
        }
    }

    /// One symmetric correction toward `target`.
    pub fn resolve(&self, particles: &mut [Particle<F>]) {
        let direction = particles[self.b].position - particles[self.a].position;
        let length = direction.length();
        if length.is_near_zero(F::from_f32(DEGENERATE_LENGTH)) {
            return;
        }

        let factor = self.stiffness * (F::one() - self.target / length);
        let correction = direction.scale(factor);

        particles[self.a].correct(correction);
        particles[self.b].correct(-correction);
    }

    /// Current endpoint positions `(begin, end)`.
    pub fn endpoints(&self, particles: &[Particle<F>]) -> (Vec2<F>, Vec2<F>) {
        (particles[self.a].position, particles[self.b].position)
    }

    /// Current length over target, mapped from `[0.8, 1.2]` onto `[-1, 1]`.
    ///
    /// Negative when compressed, positive when stretched, `0` at rest.
    pub fn deviation(&self, particles: &[Particle<F>]) -> F {
        if self.target.is_near_zero(F::from_f32(DEGENERATE_LENGTH)) {
            return F::zero();
        }
        let (begin, end) = self.endpoints(particles);
        let ratio = begin.distance(end) / self.target;
        ratio.remap(F::from_f32(0.8), F::from_f32(1.2), -F::one(), F::one())
    }
}

/// Map a `[0, 1]` stiffness factor into the constraint stiffness band.
pub fn stiffness_from_factor<F: Float>(factor: F) -> F {
    factor.remap(
        F::zero(),
        F::one(),
        F::from_f32(MIN_DIST_STIFFNESS),
        F::from_f32(MAX_DIST_STIFFNESS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn stiffness_band_is_clamped() {
        assert!((stiffness_from_factor(0.0f64) - 0.4).abs() < 1e-12);
        assert!((stiffness_from_factor(1.0f64) - 0.7).abs() < 1e-12);
        assert!((stiffness_from_factor(5.0f64) - 0.7).abs() < 1e-12);
        assert!((stiffness_from_factor(-1.0f64) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn resolve_pulls_stretched_pair_together() {
        let mut particles = vec![
            Particle::new(Vec2::new(0.0f32, 0.0), 1.0),
            Particle::new(Vec2::new(10.0f32, 0.0), 1.0),
        ];
        let c = DistanceConstraint::from_particles(0, 0, 1, &particles, 1.0);
        particles[1].position = Vec2::new(20.0, 0.0);

        c.resolve(&mut particles);
        // factor = 0.7 * (1 - 10/20) = 0.35, correction = 20 * 0.35 = 7
        assert!((particles[0].position.x - 7.0).abs() < 1e-5);
        assert!((particles[1].position.x - 13.0).abs() < 1e-5);
    }

    #[test]
    fn resolve_at_rest_is_a_no_op() {
        let mut particles = vec![
            Particle::fixed(Vec2::new(0.0f32, 50.0)),
            Particle::new(Vec2::new(100.0f32, 37.5), 1.0),
        ];
        let c = DistanceConstraint::from_particles(0, 0, 1, &particles, 0.5);
        c.resolve(&mut particles);
        assert_eq!(particles[1].position, Vec2::new(100.0, 37.5));
    }

    #[test]
    fn only_free_end_moves_against_fixed_end() {
        let mut particles = vec![
            Particle::fixed(Vec2::new(0.0f32, 0.0)),
            Particle::new(Vec2::new(10.0f32, 0.0), 1.0),
        ];
        let c = DistanceConstraint::from_particles(0, 0, 1, &particles, 0.0);
        particles[1].position = Vec2::new(20.0, 0.0);
        c.resolve(&mut particles);
        assert_eq!(particles[0].position, Vec2::zero());
        assert!(particles[1].position.x < 20.0);
    }

    #[test]
    fn coincident_particles_are_skipped() {
        let mut particles = vec![
            Particle::new(Vec2::new(0.0f32, 0.0), 1.0),
            Particle::new(Vec2::new(5.0f32, 0.0), 1.0),
        ];
        let c = DistanceConstraint::from_particles(0, 0, 1, &particles, 0.5);
        particles[1].position = Vec2::zero();
        c.resolve(&mut particles);
        assert!(particles[0].position.is_finite());
        assert!(particles[1].position.is_finite());
    }

    #[test]
    fn deviation_sign_tracks_stretch() {
        let mut particles = vec![
            Particle::new(Vec2::new(0.0f64, 0.0), 1.0),
            Particle::new(Vec2::new(10.0f64, 0.0), 1.0),
        ];
        let c = DistanceConstraint::from_particles(0, 0, 1, &particles, 0.5);
        assert!(c.deviation(&particles).abs() < 1e-9);

        particles[1].position = Vec2::new(11.0, 0.0);
        assert!((c.deviation(&particles) - 0.5).abs() < 1e-9);

        particles[1].position = Vec2::new(5.0, 0.0);
        assert_eq!(c.deviation(&particles), -1.0);
    }
}
