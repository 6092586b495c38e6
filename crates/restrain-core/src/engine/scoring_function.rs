use super::config::EvaluationConfig;
use crate::core::models::ids::ParticleIndex;
use crate::core::models::model::{Model, ModelObject};
use crate::core::scoring::accumulator::{EvaluationState, ScoreAccumulator};
use crate::core::scoring::info::RestraintInfo;
use crate::core::scoring::restraint::{Restraint, WeightedRestraint};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A set of weighted restraints evaluated together.
#[derive(Debug, Clone, Default)]
pub struct ScoringFunction {
    restraints: Vec<WeightedRestraint>,
}

impl ScoringFunction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_restraints(restraints: Vec<WeightedRestraint>) -> Self {
        Self { restraints }
    }

    /// Adds a restraint with unit weight.
    pub fn add(&mut self, restraint: Arc<dyn Restraint>) {
        self.add_weighted(restraint, 1.0);
    }

    pub fn add_weighted(&mut self, restraint: Arc<dyn Restraint>, weight: f64) {
        self.restraints.push(WeightedRestraint::new(restraint, weight));
    }

    pub fn restraints(&self) -> &[WeightedRestraint] {
        &self.restraints
    }

    pub fn len(&self) -> usize {
        self.restraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restraints.is_empty()
    }

    /// Runs one accumulator pass over every restraint and returns the total score.
    ///
    /// With `config.compute_derivatives`, the model's derivative slots hold the summed
    /// weighted derivatives afterwards (zeroed first if `config.reset_derivatives`).
    #[instrument(
        skip_all,
        name = "scoring_function_pass",
        fields(restraints = self.restraints.len())
    )]
    pub fn evaluate(&self, model: &Model, config: &EvaluationConfig) -> f64 {
        Self::run_pass(self.restraints.iter().collect(), model, config)
    }

    /// Runs one accumulator pass over only the restraints that read any of `changed`.
    ///
    /// The result is the partial score of the affected restraints; combining it with
    /// cached scores of unaffected restraints is up to the caller.
    #[instrument(skip_all, name = "scoring_function_partial_pass", fields(changed = changed.len()))]
    pub fn evaluate_affected(
        &self,
        model: &Model,
        config: &EvaluationConfig,
        changed: &[ParticleIndex],
    ) -> f64 {
        Self::run_pass(self.affected_by(changed), model, config)
    }

    /// The restraints whose inputs include any of the `changed` particles.
    pub fn affected_by(&self, changed: &[ParticleIndex]) -> Vec<&WeightedRestraint> {
        let changed: HashSet<ModelObject> =
            changed.iter().copied().map(ModelObject::Particle).collect();
        self.restraints
            .iter()
            .filter(|entry| {
                entry
                    .restraint
                    .inputs()
                    .iter()
                    .any(|input| changed.contains(input))
            })
            .collect()
    }

    /// The union of every restraint's inputs.
    pub fn inputs(&self) -> HashSet<ModelObject> {
        self.restraints
            .iter()
            .flat_map(|entry| entry.restraint.inputs())
            .collect()
    }

    /// The static info of every restraint that exports one, keyed by restraint name.
    pub fn static_info(&self) -> Vec<(String, RestraintInfo)> {
        self.restraints
            .iter()
            .filter_map(|entry| {
                entry
                    .restraint
                    .static_info()
                    .map(|info| (entry.restraint.name().to_string(), info))
            })
            .collect()
    }

    fn run_pass(
        selected: Vec<&WeightedRestraint>,
        model: &Model,
        config: &EvaluationConfig,
    ) -> f64 {
        if config.compute_derivatives && config.reset_derivatives {
            model.zero_derivatives();
        }

        let state = EvaluationState::new();
        let accumulator = ScoreAccumulator::new(&state, config.weight, config.compute_derivatives);

        #[cfg(not(feature = "parallel"))]
        let iterator = selected.iter();

        #[cfg(feature = "parallel")]
        let iterator = selected.par_iter();

        iterator.for_each(|entry| {
            trace!(restraint = entry.restraint.name(), "Evaluating restraint.");
            entry.add_score_and_derivatives(model, accumulator);
        });

        state.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::restraints::harmonic_anchor::HarmonicAnchor;
    use crate::core::restraints::recorded_anchor::RecordedHarmonicAnchor;
    use nalgebra::{Point3, Vector3};

    fn anchored_model(
        zs: &[f64],
        stiffness: f64,
    ) -> (Model, Vec<ParticleIndex>, Vec<Arc<dyn Restraint>>) {
        let mut model = Model::new();
        let particles: Vec<_> = zs
            .iter()
            .enumerate()
            .map(|(i, &z)| model.add_particle(&format!("p{i}"), Point3::new(0.0, 0.0, z)))
            .collect();
        let restraints = particles
            .iter()
            .map(|&p| {
                Arc::new(HarmonicAnchor::new(&model, p, stiffness).unwrap()) as Arc<dyn Restraint>
            })
            .collect();
        (model, particles, restraints)
    }

    #[test]
    fn empty_function_scores_zero() {
        let model = Model::new();
        let score = ScoringFunction::new().evaluate(&model, &EvaluationConfig::with_derivatives());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn evaluate_sums_all_restraints() {
        let (model, _, restraints) = anchored_model(&[1.0, 2.0, 3.0], 2.0);
        let mut function = ScoringFunction::new();
        for restraint in restraints {
            function.add(restraint);
        }
        let score = function.evaluate(&model, &EvaluationConfig::score_only());
        assert!((score - (1.0 + 4.0 + 9.0)).abs() < 1e-12);
    }

    #[test]
    fn total_is_independent_of_restraint_order() {
        let zs = [0.3, -1.7, 2.9, 4.1, -0.05, 7.25];
        let (model, _, restraints) = anchored_model(&zs, 1.3);
        let forward = ScoringFunction::from_restraints(
            restraints.iter().cloned().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );
        let backward = ScoringFunction::from_restraints(
            restraints.iter().rev().cloned().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );
        let mut rotated: Vec<_> = restraints.clone();
        rotated.rotate_left(2);
        let rotated = ScoringFunction::from_restraints(
            rotated.into_iter().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );

        let config = EvaluationConfig::score_only();
        let reference = forward.evaluate(&model, &config);
        assert!((backward.evaluate(&model, &config) - reference).abs() < 1e-9);
        assert!((rotated.evaluate(&model, &config) - reference).abs() < 1e-9);
    }

    #[test]
    fn shared_particle_derivatives_accumulate_across_restraints() {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::new(0.0, 0.0, 2.0));
        let mut function = ScoringFunction::new();
        function.add(Arc::new(HarmonicAnchor::new(&model, p, 1.0).unwrap()));
        function.add(Arc::new(RecordedHarmonicAnchor::new(&model, p, 3.0).unwrap()));

        let score = function.evaluate(&model, &EvaluationConfig::with_derivatives());

        assert_eq!(score, 2.0 + 6.0);
        assert_eq!(model.derivatives(p), Some(Vector3::new(0.0, 0.0, 2.0 + 6.0)));
    }

    #[test]
    fn weights_scale_score_and_derivatives() {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::new(0.0, 0.0, 4.0));
        let mut function = ScoringFunction::new();
        function.add_weighted(Arc::new(HarmonicAnchor::new(&model, p, 3.0).unwrap()), 0.5);
        let config = EvaluationConfig {
            weight: 2.0,
            ..EvaluationConfig::with_derivatives()
        };

        assert_eq!(function.evaluate(&model, &config), 24.0);
        assert_eq!(model.derivatives(p), Some(Vector3::new(0.0, 0.0, 12.0)));
    }

    #[test]
    fn repeated_derivative_passes_reset_or_accumulate_per_config() {
        let (model, particles, restraints) = anchored_model(&[4.0], 3.0);
        let function = ScoringFunction::from_restraints(
            restraints.into_iter().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );

        function.evaluate(&model, &EvaluationConfig::with_derivatives());
        function.evaluate(&model, &EvaluationConfig::with_derivatives());
        assert_eq!(model.derivatives(particles[0]), Some(Vector3::new(0.0, 0.0, 12.0)));

        let accumulate = EvaluationConfig {
            reset_derivatives: false,
            ..EvaluationConfig::with_derivatives()
        };
        function.evaluate(&model, &accumulate);
        assert_eq!(model.derivatives(particles[0]), Some(Vector3::new(0.0, 0.0, 24.0)));
    }

    #[test]
    fn score_only_pass_leaves_derivatives_untouched() {
        let (model, particles, restraints) = anchored_model(&[4.0], 3.0);
        let function = ScoringFunction::from_restraints(
            restraints.into_iter().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );
        assert_eq!(function.evaluate(&model, &EvaluationConfig::score_only()), 24.0);
        assert_eq!(model.derivatives(particles[0]), Some(Vector3::zeros()));
    }

    #[test]
    fn affected_by_selects_restraints_reading_changed_particles() {
        let (model, particles, restraints) = anchored_model(&[1.0, 2.0, 3.0], 2.0);
        let function = ScoringFunction::from_restraints(
            restraints.into_iter().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );

        let affected = function.affected_by(&[particles[1]]);
        assert_eq!(affected.len(), 1);
        assert_eq!(
            affected[0].restraint.inputs(),
            vec![ModelObject::Particle(particles[1])]
        );

        let partial =
            function.evaluate_affected(&model, &EvaluationConfig::score_only(), &[particles[1]]);
        assert_eq!(partial, 4.0);
        assert!(function.affected_by(&[]).is_empty());
    }

    #[test]
    fn inputs_is_union_of_restraint_inputs() {
        let (_, particles, restraints) = anchored_model(&[1.0, 2.0], 1.0);
        let function = ScoringFunction::from_restraints(
            restraints.into_iter().map(|r| WeightedRestraint::new(r, 1.0)).collect(),
        );
        let expected: HashSet<_> = particles.into_iter().map(ModelObject::Particle).collect();
        assert_eq!(function.inputs(), expected);
    }

    #[test]
    fn static_info_lists_only_exporting_restraints() {
        let mut model = Model::new();
        let p = model.add_particle("p", Point3::origin());
        let recorded = RecordedHarmonicAnchor::new(&model, p, 2.5).unwrap();
        let recorded_name = recorded.name().to_string();
        let mut function = ScoringFunction::new();
        function.add(Arc::new(HarmonicAnchor::new(&model, p, 1.0).unwrap()));
        function.add(Arc::new(recorded));

        let infos = function.static_info();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].0, recorded_name);
        assert_eq!(infos[0].1.float_value(0), Some(2.5));
    }
}
