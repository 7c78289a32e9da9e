//! Configuration types for the simulation engine.

use crate::float::Float;

/// What the engine does with a segment bent past the angle limit.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BendPolicy {
    /// Segments past `angle_limit` integrate with `delta * slowdown`; a
    /// segment past `reset_angle` has its base rail pair snapped to rest.
    #[default]
    SoftSlowdown,
    /// The first segment at or past `angle_limit` stops integration of
    /// itself and everything further out for the rest of the frame.
    HardFreeze,
}

/// Configuration for the elastic simulation engine.
///
/// # Builder Pattern
/// ```
/// use elastica::config::{BendPolicy, SimulationConfig};
///
/// let config: SimulationConfig<f32> = SimulationConfig::new()
///     .with_angle_limit(25.0)
///     .with_bend_policy(BendPolicy::HardFreeze);
/// assert_eq!(config.angle_limit, 25.0);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig<F: Float> {
    /// Bend angle in degrees past which a segment counts as over-bent.
    /// Default: 30.
    pub angle_limit: F,
    /// Bend angle in degrees past which `SoftSlowdown` resets a rail pair.
    /// Default: 90.
    pub reset_angle: F,
    /// Delta multiplier for over-bent segments under `SoftSlowdown`.
    /// Default: 0.1.
    pub slowdown: F,
    /// Per-segment decay of mass and stiffness when variation is on.
    /// Default: 0.4.
    pub variation_change: F,
    pub bend_policy: BendPolicy,
}

impl<F: Float> SimulationConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SimulationConfig {
            angle_limit: F::from_f32(30.0),
            reset_angle: F::from_f32(90.0),
            slowdown: F::from_f32(0.1),
            variation_change: F::from_f32(0.4),
            bend_policy: BendPolicy::default(),
        }
    }

    pub fn with_angle_limit(mut self, degrees: F) -> Self {
        self.angle_limit = degrees;
        self
    }

    pub fn with_reset_angle(mut self, degrees: F) -> Self {
        self.reset_angle = degrees;
        self
    }

    /// Set the slowdown multiplier, clamped to `[0, 1]`.
    pub fn with_slowdown(mut self, slowdown: F) -> Self {
        self.slowdown = slowdown.clamp(F::zero(), F::one());
        self
    }

    /// Set the variation decay, clamped to `[0, 1]`.
    pub fn with_variation_change(mut self, change: F) -> Self {
        self.variation_change = change.clamp(F::zero(), F::one());
        self
    }

    pub fn with_bend_policy(mut self, policy: BendPolicy) -> Self {
        self.bend_policy = policy;
        self
    }
}

impl<F: Float> Default for SimulationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
