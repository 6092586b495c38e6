//! # Scoring Module
//!
//! The contract every scoring term implements and the sinks it writes into.
//!
//! ## Key Components
//!
//! - [`restraint`] - The [`restraint::Restraint`] trait, shared identity bookkeeping and construction errors
//! - [`accumulator`] - Write-only score and derivative sinks for one evaluation pass
//! - [`info`] - Static, typed key/value descriptions of a restraint for external output
//!
//! ## Usage
//!
//! ```ignore
//! use restrain::core::scoring::accumulator::{EvaluationState, ScoreAccumulator};
//!
//! let state = EvaluationState::new();
//! restraint.add_score_and_derivatives(&model, ScoreAccumulator::new(&state, 1.0, true));
//! let score = state.score();
//! ```

pub mod accumulator;
pub mod info;
pub mod restraint;
