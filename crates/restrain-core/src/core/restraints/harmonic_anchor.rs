use super::{ANCHOR_NAME_TEMPLATE, add_anchor_terms, validate_anchor};
use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::{Model, ModelObject};
use crate::core::scoring::accumulator::ScoreAccumulator;
use crate::core::scoring::restraint::{Restraint, RestraintBase, RestraintError};
use tracing::debug;

/// Pulls one particle's z coordinate toward zero with a harmonic penalty.
///
/// Exports no static info and has no persistent form; see
/// [`RecordedHarmonicAnchor`](super::recorded_anchor::RecordedHarmonicAnchor) for the
/// kind that does.
#[derive(Debug, Clone)]
pub struct HarmonicAnchor {
    base: RestraintBase,
    particle: ParticleIndex,
    stiffness: f64,
}

impl HarmonicAnchor {
    /// Binds a new anchor to `particle`.
    ///
    /// # Arguments
    ///
    /// * `model` - The model `particle` belongs to.
    /// * `particle` - The particle whose z coordinate is restrained.
    /// * `stiffness` - The force constant `k`; finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`RestraintError::ParticleNotFound`] if `particle` is not in `model`, or
    /// [`RestraintError::InvalidParameter`] for an unusable stiffness.
    pub fn new(
        model: &Model,
        particle: ParticleIndex,
        stiffness: f64,
    ) -> Result<Self, RestraintError> {
        validate_anchor(model, particle, stiffness)?;
        let base = RestraintBase::from_template(ANCHOR_NAME_TEMPLATE);
        debug!(name = base.name(), ?particle, stiffness, "Created harmonic anchor.");
        Ok(Self {
            base,
            particle,
            stiffness,
        })
    }

    pub fn particle(&self) -> ParticleIndex {
        self.particle
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }
}

impl Restraint for HarmonicAnchor {
    fn base(&self) -> &RestraintBase {
        &self.base
    }

    fn add_score_and_derivatives(&self, model: &Model, accumulator: ScoreAccumulator<'_>) {
        add_anchor_terms(model, self.particle, self.stiffness, accumulator);
    }

    fn inputs(&self) -> Vec<ModelObject> {
        vec![ModelObject::Particle(self.particle)]
    }
}
