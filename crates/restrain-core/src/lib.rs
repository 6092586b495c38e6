//! # Restrain Core Library
//!
//! Pluggable scoring terms ("restraints") for particle-based models. A restraint reads
//! the state of a few particles, adds a scalar score to a shared accumulator and, when
//! asked, adds its analytic derivative to the particles' derivative slots so that a
//! gradient-based optimizer can drive the model.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** The particle store (`Model`), the evaluation
//!   contract (`Restraint`, `ScoreAccumulator`, `RestraintInfo`), the concrete
//!   restraint kinds, and the serialized record formats.
//!
//! - **[`engine`]: The Evaluation Layer.** Runs accumulator passes over many weighted
//!   restraints at once (in parallel with the `parallel` feature), tracks which
//!   restraints depend on which particles, and checkpoints whole sessions.
//!
//! - **[`workflows`]: The Public API.** A `Session` that ties a model and its scoring
//!   function together and can be loaded from a scene file or a checkpoint.

pub mod core;
pub mod engine;
pub mod workflows;
