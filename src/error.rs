//! Error types for simulation operations.

use crate::sim::SimId;

/// Errors reported by the mutating simulation operations.
///
/// A call that returns an error has not changed any state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    /// A strip needs at least one segment.
    #[error("segment count must be at least 1, got {0}")]
    InvalidSegments(usize),
    /// Stiffness factor is negative, NaN or infinite.
    #[error("stiffness factor must be finite and non-negative")]
    InvalidStiffness,
    /// The rectangle is too small to span two distinct rails.
    #[error("rectangle is too small to build a strip")]
    DegenerateGeometry,
    /// Sim id has never been allocated.
    #[error("sim id {id} out of bounds (count: {count})")]
    SimOutOfBounds { id: SimId, count: usize },
    /// Particle or constraint index out of bounds.
    #[error("index {index} out of bounds (count: {count})")]
    IndexOutOfBounds { index: usize, count: usize },
    /// `Removed` cannot be set directly; use `remove_sim`.
    #[error("state cannot be assigned directly")]
    InvalidState,
}
