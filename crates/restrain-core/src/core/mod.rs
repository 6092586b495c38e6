//! # Core Module
//!
//! The building blocks every evaluation pass is made of.
//!
//! - **Particle Storage** ([`models`]) - Arena-backed particles addressed by [`models::ids::ParticleIndex`]
//! - **Evaluation Contract** ([`scoring`]) - The `Restraint` trait, accumulators and static info records
//! - **Restraint Kinds** ([`restraints`]) - Concrete scoring terms
//! - **Serialization** ([`io`]) - Persistent restraint records and TOML scene files
//! - **Utilities** ([`utils`]) - Lock-free numeric primitives shared by the layers above

pub mod io;
pub mod models;
pub mod restraints;
pub mod scoring;
pub mod utils;
