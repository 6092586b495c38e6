use super::accumulator::{EvaluationState, ScoreAccumulator};
use super::info::RestraintInfo;
use crate::core::io::records::{BaseRecord, RestraintRecord};
use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::{Model, ModelObject};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Placeholder in a name template replaced by the instance's sequence number.
pub const NAME_SEQUENCE_PLACEHOLDER: &str = "%1%";

static NEXT_SEQUENCE_NUMBER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RestraintError {
    #[error("Particle {0:?} does not exist in the model")]
    ParticleNotFound(ParticleIndex),
    #[error("Invalid value {value} for parameter '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Identity bookkeeping shared by every restraint kind.
///
/// The name is for logs and output only; it never influences scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestraintBase {
    name: String,
}

impl RestraintBase {
    /// Creates a base whose name is `template` with [`NAME_SEQUENCE_PLACEHOLDER`]
    /// replaced by a process-wide unique sequence number.
    pub fn from_template(template: &str) -> Self {
        let sequence = NEXT_SEQUENCE_NUMBER.fetch_add(1, Ordering::Relaxed);
        Self {
            name: template.replace(NAME_SEQUENCE_PLACEHOLDER, &sequence.to_string()),
        }
    }

    /// Creates a base with an exact name, e.g. one restored from a checkpoint.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_record(&self) -> BaseRecord {
        BaseRecord {
            name: self.name.clone(),
        }
    }

    /// Restores a base from its record. If the recorded name was generated from
    /// `template`, later [`from_template`](Self::from_template) calls continue past its
    /// sequence number so no two live restraints share a name.
    pub fn from_record(record: &BaseRecord, template: &str) -> Self {
        if let Some(next) = sequence_number(template, &record.name).and_then(|n| n.checked_add(1))
        {
            NEXT_SEQUENCE_NUMBER.fetch_max(next, Ordering::Relaxed);
        }
        Self::named(record.name.clone())
    }
}

/// The sequence number `template` substituted to produce `name`, if it did.
fn sequence_number(template: &str, name: &str) -> Option<usize> {
    let (prefix, suffix) = template.split_once(NAME_SEQUENCE_PLACEHOLDER)?;
    let digits = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A scoring term over a fixed set of particles.
///
/// Implementations hold particle indices and immutable parameters. Given the current
/// particle state, a restraint's contribution is a pure function: evaluating it never
/// mutates coordinates, and its only side effects are the additive writes into the
/// accumulator and the model's derivative slots.
pub trait Restraint: Send + Sync + fmt::Debug {
    /// Shared identity bookkeeping.
    fn base(&self) -> &RestraintBase;

    /// Adds this restraint's score to `accumulator` and, if the accumulator carries a
    /// derivative target, its derivatives to the model.
    ///
    /// # Panics
    ///
    /// Panics if a bound particle was removed from `model`.
    fn add_score_and_derivatives(&self, model: &Model, accumulator: ScoreAccumulator<'_>);

    /// The exact set of model objects this restraint reads.
    fn inputs(&self) -> Vec<ModelObject>;

    /// Static description for output writers, if this kind exports one.
    fn static_info(&self) -> Option<RestraintInfo> {
        None
    }

    /// The persistent form of this restraint, if this kind supports persistence.
    fn to_record(&self) -> Option<RestraintRecord> {
        None
    }

    fn name(&self) -> &str {
        self.base().name()
    }

    /// Evaluates this restraint alone and returns its score.
    ///
    /// A derivative pass starts from zeroed derivative slots, so afterwards the model
    /// holds exactly this restraint's derivatives.
    fn evaluate(&self, model: &Model, compute_derivatives: bool) -> f64 {
        if compute_derivatives {
            model.zero_derivatives();
        }
        let state = EvaluationState::new();
        self.add_score_and_derivatives(
            model,
            ScoreAccumulator::new(&state, 1.0, compute_derivatives),
        );
        state.score()
    }
}

/// A restraint together with the weight its contributions are scaled by.
#[derive(Debug, Clone)]
pub struct WeightedRestraint {
    pub restraint: Arc<dyn Restraint>,
    pub weight: f64,
}

impl WeightedRestraint {
    pub fn new(restraint: Arc<dyn Restraint>, weight: f64) -> Self {
        Self { restraint, weight }
    }

    /// Adds the weighted contribution of the restraint to `accumulator`.
    #[inline]
    pub fn add_score_and_derivatives(&self, model: &Model, accumulator: ScoreAccumulator<'_>) {
        self.restraint
            .add_score_and_derivatives(model, accumulator.with_weight(self.weight));
    }
}
