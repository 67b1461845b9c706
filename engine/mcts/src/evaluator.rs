//! Predictor contract for position evaluation.
//!
//! A predictor maps a player-relative observation to a prior over the full
//! action space and a value for the player to move. In training this is a
//! neural network; [`UniformPredictor`] stands in when no model is loaded.

use std::sync::Arc;

use engine_core::Observation;
use thiserror::Error;

/// Errors that can occur during prediction.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("policy has {got} entries, expected {expected}")]
    PolicyLength { expected: usize, got: usize },

    #[error("value {0} is outside [-1, 1]")]
    ValueOutOfRange(f32),

    #[error("prediction failed: {0}")]
    Failed(String),
}

/// Output of one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Prior over every action id, legal or not.
    pub policy: Vec<f32>,

    /// Expected outcome for the player to move, in `[-1, 1]`.
    pub value: f32,
}

impl Prediction {
    /// Check the shape the search relies on.
    pub fn validate(&self, num_actions: usize) -> Result<(), PredictorError> {
        if self.policy.len() != num_actions {
            return Err(PredictorError::PolicyLength {
                expected: num_actions,
                got: self.policy.len(),
            });
        }
        if !(-1.0..=1.0).contains(&self.value) {
            return Err(PredictorError::ValueOutOfRange(self.value));
        }
        Ok(())
    }
}

/// Trait for position predictors.
///
/// Searches call `predict` once per expansion, sequentially. Implementations
/// shared between concurrent searches handle their own synchronisation.
pub trait Predictor: Send + Sync {
    fn predict(&self, observation: &Observation) -> Result<Prediction, PredictorError>;
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, observation: &Observation) -> Result<Prediction, PredictorError> {
        (**self).predict(observation)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, observation: &Observation) -> Result<Prediction, PredictorError> {
        (**self).predict(observation)
    }
}

/// Uniform policy over the whole action space and a neutral value.
///
/// Legality masking in the search turns this into a uniform prior over the
/// legal moves.
#[derive(Debug, Clone)]
pub struct UniformPredictor {
    num_actions: usize,
}

impl UniformPredictor {
    pub fn new(num_actions: usize) -> Self {
        Self { num_actions }
    }
}

impl Predictor for UniformPredictor {
    fn predict(&self, _observation: &Observation) -> Result<Prediction, PredictorError> {
        let p = if self.num_actions == 0 {
            0.0
        } else {
            1.0 / self.num_actions as f32
        };
        Ok(Prediction {
            policy: vec![p; self.num_actions],
            value: 0.0,
        })
    }
}
