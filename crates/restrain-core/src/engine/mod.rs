//! # Engine Module
//!
//! Runs evaluation passes over many restraints and persists whole sessions.
//!
//! ## Overview
//!
//! A [`scoring_function::ScoringFunction`] owns a list of weighted restraints. Each call
//! to `evaluate` is one accumulator pass: every restraint is invoked once with a copy
//! of the same [`ScoreAccumulator`](crate::core::scoring::accumulator::ScoreAccumulator),
//! in parallel when the `parallel` feature is enabled. Because every write is an
//! atomic addition, the pass total does not depend on evaluation order.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - What a pass computes
//! - **Evaluation** ([`scoring_function`]) - Weighted restraint sets and dependency queries
//! - **Persistence** ([`checkpoint`]) - Versioned snapshots of a model and its restraints
//! - **Error Handling** ([`error`]) - Engine-level error type

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod scoring_function;
