use crate::core::utils::atomic::AtomicF64;

/// The shared totals of one evaluation pass.
///
/// Owned by whoever runs the pass; restraints only see it through a
/// [`ScoreAccumulator`].
#[derive(Debug, Default)]
pub struct EvaluationState {
    score: AtomicF64,
}

impl EvaluationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The weighted score accumulated so far.
    pub fn score(&self) -> f64 {
        self.score.load()
    }
}

/// Weighting context for derivative contributions of one pass.
///
/// Passed to [`Model::add_to_derivative`](crate::core::models::model::Model::add_to_derivative),
/// which scales each contribution by [`DerivativeAccumulator::weight`] before adding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivativeAccumulator {
    weight: f64,
}

impl DerivativeAccumulator {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// A nested context whose contributions are additionally scaled by `weight`.
    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            weight: self.weight * weight,
        }
    }
}

impl Default for DerivativeAccumulator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// The write-only sink a restraint receives for one evaluation pass.
///
/// Restraints cannot read the running total, only add to it. Every addition is an
/// atomic floating-point add, so copies of one accumulator can be handed to many
/// restraints evaluated in parallel.
#[derive(Debug, Clone, Copy)]
pub struct ScoreAccumulator<'a> {
    state: &'a EvaluationState,
    weight: f64,
    derivatives: Option<DerivativeAccumulator>,
}

impl<'a> ScoreAccumulator<'a> {
    /// Creates an accumulator over `state`.
    ///
    /// # Arguments
    ///
    /// * `state` - The pass totals to add into.
    /// * `weight` - Factor applied to every score and derivative added through this accumulator.
    /// * `compute_derivatives` - Whether this pass requests derivatives.
    pub fn new(state: &'a EvaluationState, weight: f64, compute_derivatives: bool) -> Self {
        Self {
            state,
            weight,
            derivatives: compute_derivatives.then(|| DerivativeAccumulator::new(weight)),
        }
    }

    /// An accumulator over the same pass with `weight` folded into the current weight.
    pub fn with_weight(self, weight: f64) -> Self {
        Self {
            state: self.state,
            weight: self.weight * weight,
            derivatives: self.derivatives.map(|da| da.with_weight(weight)),
        }
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Adds a weighted score to the pass total. Calling this twice adds twice.
    #[inline]
    pub fn add_score(&self, score: f64) {
        self.state.score.fetch_add(self.weight * score);
    }

    /// The derivative target of this pass, or `None` on score-only passes.
    ///
    /// Restraints check this before computing any derivative.
    #[inline]
    pub fn derivative_accumulator(&self) -> Option<&DerivativeAccumulator> {
        self.derivatives.as_ref()
    }
}
