//! Per-strip force modulation for [`SimulationController`](crate::controller::SimulationController).
//!
//! A modulator turns `(sim_id, time)` into a component-wise scale of the
//! controller's uniform force. Strips a modulator knows nothing about get no
//! force while it is active.

use crate::float::Float;
use crate::sim::SimId;
use crate::vec::Vec2;
use alloc::collections::BTreeMap;

/// Source of per-strip force scales.
pub trait ForceModulator<F: Float> {
    /// Scale for `sim_id` at controller time `time`, `None` when the strip is
    /// not modulated.
    fn modulation(&self, sim_id: SimId, time: F) -> Option<Vec2<F>>;

    /// An inactive modulator leaves every strip under the uniform force.
    fn is_active(&self) -> bool;
}

/// Fixed scales that ignore time.
pub type StaticModulation<F> = BTreeMap<SimId, Vec2<F>>;

impl<F: Float> ForceModulator<F> for BTreeMap<SimId, Vec2<F>> {
    fn modulation(&self, sim_id: SimId, _time: F) -> Option<Vec2<F>> {
        self.get(&sim_id).copied()
    }

    fn is_active(&self) -> bool {
        !self.is_empty()
    }
}

#[cfg(feature = "noise")]
pub use self::simplex::{NoiseModulator, NoiseSource};

#[cfg(feature = "noise")]
mod simplex {
    use super::ForceModulator;
    use crate::float::Float;
    use crate::sim::SimId;
    use crate::vec::Vec2;
    use alloc::collections::BTreeMap;
    use noise::{NoiseFn, OpenSimplex};

    /// Where a strip samples the wind field and how strongly it reacts.
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub struct NoiseSource<F: Float> {
        /// Strip position in world units.
        pub position: Vec2<F>,
        /// Component-wise gain on the wind direction.
        pub scale: Vec2<F>,
    }

    /// Wind from 3D OpenSimplex noise over `(x, y, time)`.
    ///
    /// The noise sample at a strip's position picks a direction on the unit
    /// circle; the strip's `scale` weighs it. Nearby strips sway together
    /// because they sample nearby noise.
    #[derive(Clone)]
    pub struct NoiseModulator<F: Float> {
        noise: OpenSimplex,
        resolution: F,
        sources: BTreeMap<SimId, NoiseSource<F>>,
    }

    impl<F: Float> NoiseModulator<F> {
        /// Resolution defaults to 10 world units per noise cell.
        pub fn new(seed: u32) -> Self {
            NoiseModulator {
                noise: OpenSimplex::new(seed),
                resolution: F::from_f32(10.0),
                sources: BTreeMap::new(),
            }
        }

        /// World units per noise cell, at least 1.
        pub fn with_resolution(mut self, resolution: F) -> Self {
            self.resolution = resolution.max(F::one());
            self
        }

        pub fn resolution(&self) -> F {
            self.resolution
        }

        pub fn set_source(&mut self, sim_id: SimId, position: Vec2<F>, scale: Vec2<F>) {
            self.sources.insert(sim_id, NoiseSource { position, scale });
        }

        pub fn remove_source(&mut self, sim_id: SimId) {
            self.sources.remove(&sim_id);
        }

        pub fn source(&self, sim_id: SimId) -> Option<&NoiseSource<F>> {
            self.sources.get(&sim_id)
        }

        /// Raw noise in `[-1, 1]` at `position` and `time`.
        pub fn sample(&self, position: Vec2<F>, time: F) -> F {
            let x = (position.x / self.resolution).to_f64();
            let y = (position.y / self.resolution).to_f64();
            F::from_f64(self.noise.get([x, y, time.to_f64()]))
        }

        /// Unit wind direction at `position` and `time`.
        pub fn direction(&self, position: Vec2<F>, time: F) -> Vec2<F> {
            let turn = F::two() * F::pi();
            let angle = self.sample(position, time).remap(-F::one(), F::one(), F::zero(), turn);
            Vec2::from_angle(angle)
        }
    }

    impl<F: Float> ForceModulator<F> for NoiseModulator<F> {
        fn modulation(&self, sim_id: SimId, time: F) -> Option<Vec2<F>> {
            self.sources
                .get(&sim_id)
                .map(|s| s.scale.component_mul(self.direction(s.position, time)))
        }

        fn is_active(&self) -> bool {
            !self.sources.is_empty()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn same_seed_same_wind() {
            let a: NoiseModulator<f64> = NoiseModulator::new(7);
            let b: NoiseModulator<f64> = NoiseModulator::new(7);
            let p = Vec2::new(37.0, 11.0);
            for step in 0..20 {
                let t = step as f64 * 0.37;
                assert_eq!(a.sample(p, t), b.sample(p, t));
            }
        }

        #[test]
        fn direction_is_unit_and_scaled_per_axis() {
            let mut m: NoiseModulator<f64> = NoiseModulator::new(3);
            m.set_source(2, Vec2::new(120.0, 45.0), Vec2::new(3.0, 3.0));
            m.set_source(4, Vec2::new(120.0, 45.0), Vec2::new(1.0, 0.0));
            for step in 0..20 {
                let t = step as f64 * 0.5;
                let full = m.modulation(2, t).unwrap();
                assert!((full.length() - 3.0).abs() < 1e-9);
                let flat = m.modulation(4, t).unwrap();
                assert_eq!(flat.y, 0.0);
                assert!(flat.x.abs() <= 1.0);
            }
            assert!(m.modulation(0, 0.0).is_none());
        }

        #[test]
        fn wind_turns_over_time() {
            let m: NoiseModulator<f64> = NoiseModulator::new(11);
            let p = Vec2::new(53.0, 29.0);
            let first = m.direction(p, 0.0);
            let turned = (1..50).any(|i| m.direction(p, i as f64 * 0.25).distance(first) > 1e-3);
            assert!(turned);
        }

        #[test]
        fn resolution_is_at_least_one() {
            let m: NoiseModulator<f32> = NoiseModulator::new(0).with_resolution(0.1);
            assert_eq!(m.resolution(), 1.0);
        }

        #[test]
        fn removed_source_deactivates() {
            let mut m: NoiseModulator<f32> = NoiseModulator::new(0);
            assert!(!m.is_active());
            m.set_source(1, Vec2::zero(), Vec2::new(1.0, 0.0));
            assert!(m.is_active());
            m.remove_source(1);
            assert!(!m.is_active());
        }
    }
}
