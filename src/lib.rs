//! Verlet quad-strip simulation for bending sprites and meshes.
//!
//! `elastica` builds a ladder of particles over a rectangle (two rails
//! running away from an anchored edge, braced by distance constraints) and
//! advances it every frame under an external force. Renderers read back the
//! particle positions to deform the attached quad mesh.
//!
//! # Features
//!
//! - **Strip layout**: even or dynamically halving segments from any of the
//!   four rectangle sides
//! - **Verlet integration**: position-based, implicit velocity, no damping
//! - **Single-pass constraint solve** with a bend check that either slows or
//!   freezes over-bent segments
//! - **Stable ids**: strips live in an append-only table with tombstones
//! - **Observable**: watch resets and freezes via the `StepObserver` trait
//! - **Wind**: per-strip force modulation, OpenSimplex driven with the
//!   default `noise` feature
//! - **`no_std` compatible**: only needs `alloc` with default features off

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod sim;
pub mod geometry;
pub mod simulation;
pub mod elastic;
pub mod controller;
pub mod modulation;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Size2, Vec2};
pub use particle::Particle;
pub use constraint::DistanceConstraint;
pub use sim::{Sim, SimId, SimState};
pub use geometry::{Anchor, StripGeometry};
pub use simulation::Simulation;
pub use elastic::{ConstraintView, ElasticSimulation, State};
pub use controller::{Precision, SimulationController};
pub use modulation::{ForceModulator, StaticModulation};
#[cfg(feature = "noise")]
pub use modulation::{NoiseModulator, NoiseSource};
pub use config::{BendPolicy, SimulationConfig};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::SimulationError;
