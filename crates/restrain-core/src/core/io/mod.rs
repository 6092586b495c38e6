//! # I/O Module
//!
//! Serialized forms of restraints and scenes.
//!
//! - [`records`] - Versioned, explicitly tagged records of persistent restraint kinds
//! - [`scene`] - TOML scene files describing particles and the restraints acting on them

pub mod records;
pub mod scene;
