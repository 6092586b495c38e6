use super::{ANCHOR_NAME_TEMPLATE, add_anchor_terms, validate_anchor};
use crate::core::io::records::{AnchorRecord, PersistenceError, RestraintRecord};
use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::{Model, ModelObject};
use crate::core::scoring::accumulator::ScoreAccumulator;
use crate::core::scoring::info::RestraintInfo;
use crate::core::scoring::restraint::{Restraint, RestraintBase, RestraintError};
use tracing::debug;

/// Type tag reported in the static info of [`RecordedHarmonicAnchor`].
pub const TYPE_TAG: &str = "restrain.RecordedHarmonicAnchor";

/// Static info key of the stiffness.
pub const FORCE_CONSTANT_KEY: &str = "force constant";

/// A harmonic z anchor that exports static info and can be checkpointed.
///
/// Scores exactly like [`HarmonicAnchor`](super::harmonic_anchor::HarmonicAnchor).
#[derive(Debug, Clone)]
pub struct RecordedHarmonicAnchor {
    base: RestraintBase,
    particle: ParticleIndex,
    stiffness: f64,
}

impl RecordedHarmonicAnchor {
    /// Binds a new anchor to `particle` with force constant `stiffness`.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`HarmonicAnchor::new`](super::harmonic_anchor::HarmonicAnchor::new).
    pub fn new(
        model: &Model,
        particle: ParticleIndex,
        stiffness: f64,
    ) -> Result<Self, RestraintError> {
        validate_anchor(model, particle, stiffness)?;
        let base = RestraintBase::from_template(ANCHOR_NAME_TEMPLATE);
        debug!(
            name = base.name(),
            ?particle,
            stiffness,
            "Created recorded harmonic anchor."
        );
        Ok(Self {
            base,
            particle,
            stiffness,
        })
    }

    /// Rebuilds an anchor from its persistent form, keeping the recorded name.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Restore`] if the record does not satisfy the
    /// construction preconditions against `model`.
    pub fn from_record(record: &AnchorRecord, model: &Model) -> Result<Self, PersistenceError> {
        validate_anchor(model, record.particle, record.stiffness).map_err(|source| {
            PersistenceError::Restore {
                name: record.base.name.clone(),
                source,
            }
        })?;
        debug!(name = %record.base.name, "Restored recorded harmonic anchor.");
        Ok(Self {
            base: RestraintBase::from_record(&record.base, ANCHOR_NAME_TEMPLATE),
            particle: record.particle,
            stiffness: record.stiffness,
        })
    }

    pub fn particle(&self) -> ParticleIndex {
        self.particle
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }
}

impl Restraint for RecordedHarmonicAnchor {
    fn base(&self) -> &RestraintBase {
        &self.base
    }

    fn add_score_and_derivatives(&self, model: &Model, accumulator: ScoreAccumulator<'_>) {
        add_anchor_terms(model, self.particle, self.stiffness, accumulator);
    }

    fn inputs(&self) -> Vec<ModelObject> {
        vec![ModelObject::Particle(self.particle)]
    }

    fn static_info(&self) -> Option<RestraintInfo> {
        Some(
            RestraintInfo::new()
                .with_string("type", TYPE_TAG)
                .with_float(FORCE_CONSTANT_KEY, self.stiffness),
        )
    }

    fn to_record(&self) -> Option<RestraintRecord> {
        Some(RestraintRecord::RecordedHarmonicAnchor(AnchorRecord {
            base: self.base.to_record(),
            particle: self.particle,
            stiffness: self.stiffness,
        }))
    }
}
