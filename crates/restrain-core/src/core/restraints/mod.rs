//! # Restraints Module
//!
//! Concrete scoring terms implementing [`Restraint`](crate::core::scoring::restraint::Restraint).
//!
//! Both kinds here anchor one particle's z coordinate to zero with a harmonic penalty
//! `0.5 * k * z^2` (derivative `k * z`). They are independent implementations:
//!
//! - [`harmonic_anchor::HarmonicAnchor`] - score, derivative and inputs only
//! - [`recorded_anchor::RecordedHarmonicAnchor`] - additionally exports static info and
//!   supports persistence

pub mod harmonic_anchor;
pub mod recorded_anchor;

use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::Model;
use crate::core::models::particle::Axis;
use crate::core::scoring::accumulator::ScoreAccumulator;
use crate::core::scoring::restraint::RestraintError;

/// Name template shared by the harmonic anchor kinds.
pub const ANCHOR_NAME_TEMPLATE: &str = "HarmonicAnchor%1%";

/// The coordinate the harmonic anchors pull toward zero.
pub const ANCHOR_AXIS: Axis = Axis::Z;

/// Checks the construction preconditions of an anchor.
pub(crate) fn validate_anchor(
    model: &Model,
    particle: ParticleIndex,
    stiffness: f64,
) -> Result<(), RestraintError> {
    if !model.contains(particle) {
        return Err(RestraintError::ParticleNotFound(particle));
    }
    if !stiffness.is_finite() {
        return Err(RestraintError::InvalidParameter {
            parameter: "stiffness",
            value: stiffness,
            reason: "must be finite",
        });
    }
    if stiffness < 0.0 {
        return Err(RestraintError::InvalidParameter {
            parameter: "stiffness",
            value: stiffness,
            reason: "must not be negative",
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn harmonic_score(stiffness: f64, z: f64) -> f64 {
    0.5 * stiffness * z * z
}

#[inline]
pub(crate) fn harmonic_derivative(stiffness: f64, z: f64) -> f64 {
    stiffness * z
}

/// Evaluates the z anchor of `particle` into `accumulator`.
pub(crate) fn add_anchor_terms(
    model: &Model,
    particle: ParticleIndex,
    stiffness: f64,
    accumulator: ScoreAccumulator<'_>,
) {
    let z = model.coordinate(particle, ANCHOR_AXIS);
    if let Some(da) = accumulator.derivative_accumulator() {
        model.add_to_derivative(particle, ANCHOR_AXIS, harmonic_derivative(stiffness, z), da);
    }
    accumulator.add_score(harmonic_score(stiffness, z));
}
