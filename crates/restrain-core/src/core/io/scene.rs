use crate::core::models::model::Model;
use crate::core::restraints::harmonic_anchor::HarmonicAnchor;
use crate::core::restraints::recorded_anchor::RecordedHarmonicAnchor;
use crate::core::scoring::restraint::{Restraint, RestraintError, WeightedRestraint};
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Particle name '{0}' is used more than once")]
    DuplicateParticle(String),
    #[error("Restraint refers to unknown particle '{0}'")]
    UnknownParticle(String),
    #[error("Restraint on particle '{particle}' has non-finite weight {weight}")]
    NonFiniteWeight { particle: String, weight: f64 },
    #[error("Invalid restraint on particle '{particle}': {source}")]
    Restraint {
        particle: String,
        #[source]
        source: RestraintError,
    },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SceneParticle {
    pub name: String,
    pub coordinates: [f64; 3],
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SceneRestraint {
    HarmonicAnchor {
        particle: String,
        stiffness: f64,
        #[serde(default = "default_weight")]
        weight: f64,
    },
    RecordedHarmonicAnchor {
        particle: String,
        stiffness: f64,
        #[serde(default = "default_weight")]
        weight: f64,
    },
}

/// A TOML description of particles and the restraints acting on them.
///
/// ```toml
/// [[particles]]
/// name = "p"
/// coordinates = [1.0, 2.0, 3.0]
///
/// [[restraints]]
/// kind = "recorded-harmonic-anchor"
/// particle = "p"
/// stiffness = 10.0
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default)]
    pub particles: Vec<SceneParticle>,
    #[serde(default)]
    pub restraints: Vec<SceneRestraint>,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path).map_err(|e| SceneError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SceneError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the model and its weighted restraints.
    ///
    /// Restraints are returned in file order.
    pub fn build(&self) -> Result<(Model, Vec<WeightedRestraint>), SceneError> {
        let mut model = Model::new();
        let mut by_name = HashMap::with_capacity(self.particles.len());

        for particle in &self.particles {
            let [x, y, z] = particle.coordinates;
            let index = model.add_particle(&particle.name, Point3::new(x, y, z));
            if by_name.insert(particle.name.as_str(), index).is_some() {
                return Err(SceneError::DuplicateParticle(particle.name.clone()));
            }
        }

        let restraints = self
            .restraints
            .iter()
            .map(|entry| -> Result<WeightedRestraint, SceneError> {
                let (name, stiffness, weight) = match entry {
                    SceneRestraint::HarmonicAnchor {
                        particle,
                        stiffness,
                        weight,
                    }
                    | SceneRestraint::RecordedHarmonicAnchor {
                        particle,
                        stiffness,
                        weight,
                    } => (particle, *stiffness, *weight),
                };
                let index = *by_name
                    .get(name.as_str())
                    .ok_or_else(|| SceneError::UnknownParticle(name.clone()))?;
                if !weight.is_finite() {
                    return Err(SceneError::NonFiniteWeight {
                        particle: name.clone(),
                        weight,
                    });
                }
                let to_scene_error = |source| SceneError::Restraint {
                    particle: name.clone(),
                    source,
                };
                let restraint: Arc<dyn Restraint> = match entry {
                    SceneRestraint::HarmonicAnchor { .. } => Arc::new(
                        HarmonicAnchor::new(&model, index, stiffness).map_err(to_scene_error)?,
                    ),
                    SceneRestraint::RecordedHarmonicAnchor { .. } => Arc::new(
                        RecordedHarmonicAnchor::new(&model, index, stiffness)
                            .map_err(to_scene_error)?,
                    ),
                };
                Ok(WeightedRestraint::new(restraint, weight))
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        debug!(
            particles = model.len(),
            restraints = restraints.len(),
            "Built scene."
        );
        Ok((model, restraints))
    }
}
