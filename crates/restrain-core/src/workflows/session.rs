use crate::core::io::scene::SceneFile;
use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::Model;
use crate::engine::checkpoint::SessionCheckpoint;
use crate::engine::config::EvaluationConfig;
use crate::engine::error::EngineError;
use crate::engine::scoring_function::ScoringFunction;
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Where a session is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSource {
    Scene(PathBuf),
    Checkpoint(PathBuf),
}

/// The outcome of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub score: f64,
    /// Per-particle derivatives, in model order. Empty on score-only passes.
    pub derivatives: Vec<ParticleDerivative>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDerivative {
    pub index: ParticleIndex,
    pub name: String,
    pub derivative: Vector3<f64>,
}

/// A model together with the scoring function evaluated on it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub model: Model,
    pub scoring: ScoringFunction,
}

impl Session {
    pub fn new(model: Model, scoring: ScoringFunction) -> Self {
        Self { model, scoring }
    }

    pub fn from_scene(scene: &SceneFile) -> Result<Self, EngineError> {
        let (model, restraints) = scene.build()?;
        Ok(Self::new(model, ScoringFunction::from_restraints(restraints)))
    }

    pub fn from_checkpoint(checkpoint: &SessionCheckpoint) -> Result<Self, EngineError> {
        let (model, scoring) = checkpoint.restore()?;
        Ok(Self::new(model, scoring))
    }

    #[instrument(skip_all, name = "session_load")]
    pub fn load(source: &SessionSource) -> Result<Self, EngineError> {
        let session = match source {
            SessionSource::Scene(path) => {
                info!("Loading scene from {:?}", path);
                Self::from_scene(&SceneFile::load(path)?)?
            }
            SessionSource::Checkpoint(path) => {
                info!("Restoring checkpoint from {:?}", path);
                Self::from_checkpoint(&SessionCheckpoint::read_from_path(path)?)?
            }
        };
        info!(
            "Session ready: {} particle(s), {} restraint(s).",
            session.model.len(),
            session.scoring.len()
        );
        Ok(session)
    }

    /// Runs one evaluation pass and collects per-particle derivatives if requested.
    pub fn evaluate(&self, config: &EvaluationConfig) -> EvaluationReport {
        let score = self.scoring.evaluate(&self.model, config);
        let derivatives = if config.compute_derivatives {
            self.model
                .particles_iter()
                .map(|(index, particle)| ParticleDerivative {
                    index,
                    name: particle.name.clone(),
                    derivative: particle.derivatives(),
                })
                .collect()
        } else {
            Vec::new()
        };
        EvaluationReport { score, derivatives }
    }

    pub fn checkpoint(&self) -> Result<SessionCheckpoint, EngineError> {
        Ok(SessionCheckpoint::capture(&self.model, &self.scoring)?)
    }

    pub fn save_checkpoint(&self, path: &Path) -> Result<(), EngineError> {
        self.checkpoint()?.write_to_path(path)?;
        info!("Checkpoint written to {:?}", path);
        Ok(())
    }
}
