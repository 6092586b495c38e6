use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::Model;
use crate::core::restraints::recorded_anchor::RecordedHarmonicAnchor;
use crate::core::scoring::restraint::{Restraint, RestraintError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Version of the serialized restraint and checkpoint formats written by this build.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Serialized data has format version {found}, but this build reads version {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("Serialized data carries no format version")]
    MissingVersion,
    #[error("Malformed serialized data: {0}")]
    Format(#[from] serde_json::Error),
    #[error("Restraint '{name}' does not support persistence")]
    Unsupported { name: String },
    #[error("Restraint '{name}' has non-finite weight {weight}")]
    NonFiniteWeight { name: String, weight: f64 },
    #[error("Cannot restore restraint '{name}': {source}")]
    Restore {
        name: String,
        #[source]
        source: RestraintError,
    },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Persistent form of [`RestraintBase`](crate::core::scoring::restraint::RestraintBase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseRecord {
    pub name: String,
}

/// Persistent form of a harmonic anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnchorRecord {
    pub base: BaseRecord,
    pub particle: ParticleIndex,
    pub stiffness: f64,
}

/// The persistent form of any restraint kind that supports persistence.
///
/// Encoded with an explicit `kind` tag so a heterogeneous list of restraints can be
/// restored without knowing the kinds in advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RestraintRecord {
    RecordedHarmonicAnchor(AnchorRecord),
}

impl RestraintRecord {
    /// Rebuilds the restraint against `model`.
    pub fn restore(&self, model: &Model) -> Result<Arc<dyn Restraint>, PersistenceError> {
        match self {
            RestraintRecord::RecordedHarmonicAnchor(record) => {
                Ok(Arc::new(RecordedHarmonicAnchor::from_record(record, model)?))
            }
        }
    }

    /// Captures `restraint`, failing for kinds without a persistent form.
    pub fn capture(restraint: &dyn Restraint) -> Result<Self, PersistenceError> {
        restraint
            .to_record()
            .ok_or_else(|| PersistenceError::Unsupported {
                name: restraint.name().to_string(),
            })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RestraintEnvelope {
    format_version: u32,
    restraint: RestraintRecord,
}

/// Reads the `format_version` field of a JSON document and checks it.
pub(crate) fn check_format_version(document: &serde_json::Value) -> Result<(), PersistenceError> {
    let found = document
        .get("format_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or(PersistenceError::MissingVersion)?;
    if found != u64::from(FORMAT_VERSION) {
        return Err(PersistenceError::VersionMismatch {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            expected: FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Serializes one restraint, including its base state, to a versioned JSON document.
pub fn serialize_restraint(restraint: &dyn Restraint) -> Result<String, PersistenceError> {
    let envelope = RestraintEnvelope {
        format_version: FORMAT_VERSION,
        restraint: RestraintRecord::capture(restraint)?,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Restores a restraint written by [`serialize_restraint`] against `model`.
pub fn deserialize_restraint(
    text: &str,
    model: &Model,
) -> Result<Arc<dyn Restraint>, PersistenceError> {
    let document: serde_json::Value = serde_json::from_str(text)?;
    check_format_version(&document)?;
    let envelope: RestraintEnvelope = serde_json::from_value(document)?;
    envelope.restraint.restore(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::restraints::harmonic_anchor::HarmonicAnchor;
    use nalgebra::Point3;

    fn model_and_anchor() -> (Model, RecordedHarmonicAnchor) {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::new(0.0, 0.0, 2.0));
        let anchor = RecordedHarmonicAnchor::new(&model, p, 4.0).unwrap();
        (model, anchor)
    }

    #[test]
    fn record_is_tagged_with_kind() {
        let (_, anchor) = model_and_anchor();
        let value = serde_json::to_value(anchor.to_record().unwrap()).unwrap();
        assert_eq!(value["kind"], "recorded-harmonic-anchor");
        assert_eq!(value["stiffness"], 4.0);
        assert_eq!(value["base"]["name"], anchor.name());
    }

    #[test]
    fn capture_rejects_kinds_without_persistence() {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::origin());
        let anchor = HarmonicAnchor::new(&model, p, 1.0).unwrap();
        let err = serialize_restraint(&anchor).unwrap_err();
        assert!(matches!(err, PersistenceError::Unsupported { name } if name == anchor.name()));
    }

    #[test]
    fn round_trip_restores_name_and_parameters() {
        let (model, anchor) = model_and_anchor();
        let text = serialize_restraint(&anchor).unwrap();
        let restored = deserialize_restraint(&text, &model).unwrap();
        assert_eq!(restored.to_record(), anchor.to_record());
        assert_eq!(restored.evaluate(&model, false), 8.0);
    }

    #[test]
    fn version_mismatch_is_reported() {
        let (model, anchor) = model_and_anchor();
        let mut document: serde_json::Value =
            serde_json::from_str(&serialize_restraint(&anchor).unwrap()).unwrap();
        document["format_version"] = serde_json::json!(FORMAT_VERSION + 1);

        let err = deserialize_restraint(&document.to_string(), &model).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::VersionMismatch { found, expected }
                if found == FORMAT_VERSION + 1 && expected == FORMAT_VERSION
        ));
    }

    #[test]
    fn missing_version_is_reported() {
        let (model, _) = model_and_anchor();
        let err = deserialize_restraint(r#"{"restraint": {}}"#, &model).unwrap_err();
        assert!(matches!(err, PersistenceError::MissingVersion));
    }

    #[test]
    fn unknown_kind_is_a_format_error() {
        let (model, _) = model_and_anchor();
        let text = r#"{"format_version": 1, "restraint": {"kind": "mystery"}}"#;
        let err = deserialize_restraint(text, &model).unwrap_err();
        assert!(matches!(err, PersistenceError::Format(_)));
    }

    #[test]
    fn unknown_record_field_is_a_format_error() {
        let (model, anchor) = model_and_anchor();
        let mut document: serde_json::Value =
            serde_json::from_str(&serialize_restraint(&anchor).unwrap()).unwrap();
        document["restraint"]["axis"] = serde_json::json!("x");

        let err = deserialize_restraint(&document.to_string(), &model).unwrap_err();
        assert!(matches!(err, PersistenceError::Format(_)));
    }

    #[test]
    fn stiffness_survives_round_trip_bit_for_bit() {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::new(0.0, 0.0, 1.5747540634272659));
        let anchor = RecordedHarmonicAnchor::new(&model, p, 557.9036831980786).unwrap();

        let text = serialize_restraint(&anchor).unwrap();
        let restored = deserialize_restraint(&text, &model).unwrap();

        assert_eq!(
            restored.evaluate(&model, false).to_bits(),
            anchor.evaluate(&model, false).to_bits()
        );
        assert_eq!(restored.to_record(), anchor.to_record());
    }

    #[test]
    fn malformed_text_is_a_format_error() {
        let (model, _) = model_and_anchor();
        assert!(matches!(
            deserialize_restraint("not json", &model),
            Err(PersistenceError::Format(_))
        ));
    }
}
