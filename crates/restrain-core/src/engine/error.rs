use super::config::ConfigError;
use crate::core::io::records::PersistenceError;
use crate::core::io::scene::SceneError;
use crate::core::scoring::restraint::RestraintError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Restraint construction failed: {0}")]
    Restraint(#[from] RestraintError),

    #[error("Scene loading failed: {0}")]
    Scene(#[from] SceneError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}
