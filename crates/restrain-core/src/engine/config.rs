use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{0}' must be a finite number")]
    NonFinite(&'static str),
}

/// What one evaluation pass computes.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Whether restraints add derivatives to the model.
    pub compute_derivatives: bool,
    /// Whether derivative slots are zeroed before a derivative pass.
    pub reset_derivatives: bool,
    /// Global factor applied to every restraint's score and derivatives.
    pub weight: f64,
}

impl EvaluationConfig {
    /// A score-only pass with unit weight.
    pub fn score_only() -> Self {
        Self {
            compute_derivatives: false,
            reset_derivatives: false,
            weight: 1.0,
        }
    }

    /// A pass computing score and fresh derivatives with unit weight.
    pub fn with_derivatives() -> Self {
        Self {
            compute_derivatives: true,
            reset_derivatives: true,
            weight: 1.0,
        }
    }
}

#[derive(Default)]
pub struct EvaluationConfigBuilder {
    compute_derivatives: Option<bool>,
    reset_derivatives: Option<bool>,
    weight: Option<f64>,
}

impl EvaluationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_derivatives(mut self, enabled: bool) -> Self {
        self.compute_derivatives = Some(enabled);
        self
    }
    pub fn reset_derivatives(mut self, enabled: bool) -> Self {
        self.reset_derivatives = Some(enabled);
        self
    }
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Builds the configuration.
    ///
    /// `compute_derivatives` is required. `reset_derivatives` defaults to the value of
    /// `compute_derivatives` and `weight` defaults to `1.0`.
    pub fn build(self) -> Result<EvaluationConfig, ConfigError> {
        let compute_derivatives = self
            .compute_derivatives
            .ok_or(ConfigError::MissingParameter("compute_derivatives"))?;
        let weight = self.weight.unwrap_or(1.0);
        if !weight.is_finite() {
            return Err(ConfigError::NonFinite("weight"));
        }
        Ok(EvaluationConfig {
            compute_derivatives,
            reset_derivatives: self.reset_derivatives.unwrap_or(compute_derivatives),
            weight,
        })
    }
}
