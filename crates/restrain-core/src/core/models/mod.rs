//! # Models Module
//!
//! The minimal particle store restraints are evaluated against.
//!
//! Particles live in a [`slotmap::SlotMap`] and are addressed by [`ids::ParticleIndex`]
//! keys. Restraints hold keys by value and never own particle storage, so a removed
//! particle simply stops resolving instead of leaving a dangling reference.
//!
//! Coordinates are plain `f64` values read concurrently during a pass. Derivative slots
//! are atomics so that many restraints can add into the same coordinate at once.

pub mod ids;
pub mod model;
pub mod particle;
