//! Step observer trait for monitoring simulation progress.

use crate::sim::SimId;

/// Trait for observing simulation steps.
///
/// Implement this to watch bend failures (e.g. for debug overlays or
/// tuning). All methods have default no-op implementations. Angles are in
/// degrees.
pub trait StepObserver {
    /// Called after a Sim's constraint pass.
    fn on_constraints_resolved(&mut self, _sim_id: SimId) {}

    /// Called when a segment's base rail pair is snapped back to rest.
    fn on_segment_reset(&mut self, _sim_id: SimId, _segment: usize, _deform_angle: f32) {}

    /// Called when integration of a chain stops at `segment` for this frame.
    fn on_chain_frozen(&mut self, _sim_id: SimId, _segment: usize, _deform_angle: f32) {}

    /// Called when a Sim has been fully advanced.
    fn on_sim_complete(&mut self, _sim_id: SimId) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}
