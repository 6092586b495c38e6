//! # Workflows Module
//!
//! The high-level entry point of the library.
//!
//! A [`session::Session`] bundles a model with the scoring function evaluated on it.
//! Sessions are built from a TOML scene or restored from a checkpoint, evaluated any
//! number of times, and checkpointed again.
//!
//! ```ignore
//! use restrain::workflows::session::{Session, SessionSource};
//! use restrain::engine::config::EvaluationConfig;
//!
//! let session = Session::load(&SessionSource::Scene("scene.toml".into()))?;
//! let report = session.evaluate(&EvaluationConfig::with_derivatives());
//! ```

pub mod session;
