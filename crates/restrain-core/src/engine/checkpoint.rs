use super::scoring_function::ScoringFunction;
use crate::core::io::records::{
    FORMAT_VERSION, PersistenceError, RestraintRecord, check_format_version,
};
use crate::core::models::model::Model;
use crate::core::scoring::restraint::WeightedRestraint;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// A restraint record together with its weight in the scoring function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightedRecord {
    pub weight: f64,
    pub restraint: RestraintRecord,
}

/// A snapshot of a model and the scoring function evaluated on it.
///
/// Particle indices inside the restraint records stay valid because the model is
/// stored with its arena layout intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionCheckpoint {
    pub format_version: u32,
    pub model: Model,
    pub restraints: Vec<WeightedRecord>,
}

impl SessionCheckpoint {
    /// Captures `model` and every restraint of `scoring`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unsupported`] if any restraint has no persistent form,
    /// and [`PersistenceError::NonFiniteWeight`] for weights JSON cannot represent.
    #[instrument(skip_all, name = "checkpoint_capture")]
    pub fn capture(model: &Model, scoring: &ScoringFunction) -> Result<Self, PersistenceError> {
        let restraints = scoring
            .restraints()
            .iter()
            .map(|entry| -> Result<WeightedRecord, PersistenceError> {
                check_weight(entry.restraint.name(), entry.weight)?;
                Ok(WeightedRecord {
                    weight: entry.weight,
                    restraint: RestraintRecord::capture(entry.restraint.as_ref())?,
                })
            })
            .collect::<Result<Vec<_>, PersistenceError>>()?;
        debug!(
            particles = model.len(),
            restraints = restraints.len(),
            "Captured session checkpoint."
        );
        Ok(Self {
            format_version: FORMAT_VERSION,
            model: model.clone(),
            restraints,
        })
    }

    /// Rebuilds the model and scoring function.
    #[instrument(skip_all, name = "checkpoint_restore")]
    pub fn restore(&self) -> Result<(Model, ScoringFunction), PersistenceError> {
        let model = self.model.clone();
        let restraints = self
            .restraints
            .iter()
            .map(|entry| -> Result<WeightedRestraint, PersistenceError> {
                let restraint = entry.restraint.restore(&model)?;
                check_weight(restraint.name(), entry.weight)?;
                Ok(WeightedRestraint::new(restraint, entry.weight))
            })
            .collect::<Result<Vec<_>, PersistenceError>>()?;
        debug!(restraints = restraints.len(), "Restored session checkpoint.");
        Ok((model, ScoringFunction::from_restraints(restraints)))
    }

    pub fn write_to(&self, writer: impl Write) -> Result<(), PersistenceError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a checkpoint, rejecting data written with another format version.
    pub fn read_from(reader: impl Read) -> Result<Self, PersistenceError> {
        let document: serde_json::Value = serde_json::from_reader(reader)?;
        check_format_version(&document)?;
        Ok(serde_json::from_value(document)?)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), PersistenceError> {
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(|e| io_error(path, e))
    }

    pub fn read_from_path(path: &Path) -> Result<Self, PersistenceError> {
        let file = File::open(path).map_err(|e| io_error(path, e))?;
        Self::read_from(BufReader::new(file))
    }
}

fn check_weight(name: &str, weight: f64) -> Result<(), PersistenceError> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(PersistenceError::NonFiniteWeight {
            name: name.to_string(),
            weight,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}
