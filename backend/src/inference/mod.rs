pub mod preprocess;
#[cfg(feature = "torch")]
pub mod torch;

use std::sync::Arc;

use ndarray::Array4;
use shared::Verdict;

use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Model error: {0}")]
    Model(String),
    #[error("Model file not found: {0}")]
    MissingArtifact(String),
    #[error("Model has not been loaded")]
    NotLoaded,
    #[error("Model unavailable: {0}")]
    Unavailable(String),
    #[error("Expected 2 class probabilities, got {0}")]
    UnexpectedOutput(usize),
    #[error("Model lock poisoned")]
    LockPoisoned,
}

/// A pre-trained two-class forgery classifier.
pub trait Classifier: Send + Sync {
    /// Runs one forward pass over a `(1, 128, 128, 3)` batch and returns the
    /// flattened class probabilities.
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub authentic: f32,
    pub tempered: f32,
    /// Winning probability as a percentage.
    pub confidence: f32,
}

impl Prediction {
    pub fn from_probabilities(probabilities: &[f32]) -> Result<Self, InferenceError> {
        let [authentic, tempered] = probabilities else {
            return Err(InferenceError::UnexpectedOutput(probabilities.len()));
        };
        let (authentic, tempered) = (*authentic, *tempered);

        let class_index = if tempered > authentic { 1 } else { 0 };
        Ok(Self {
            verdict: Verdict::from_class_index(class_index),
            authentic,
            tempered,
            confidence: authentic.max(tempered) * 100.0,
        })
    }

    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

/// Process-wide classifier slot, filled once before the server starts.
#[derive(Clone, Default)]
pub enum ModelState {
    #[default]
    NotLoaded,
    Ready(Arc<dyn Classifier>),
    Unavailable(String),
}

impl ModelState {
    pub fn load(config: &AppConfig) -> Self {
        #[cfg(feature = "torch")]
        {
            match torch::TorchClassifier::load(&config.model_path, config.apply_softmax) {
                Ok(classifier) => ModelState::Ready(Arc::new(classifier)),
                Err(e) => ModelState::Unavailable(e.to_string()),
            }
        }
        #[cfg(not(feature = "torch"))]
        {
            let _ = config;
            ModelState::Unavailable("built without the `torch` feature".to_string())
        }
    }

    pub fn classifier(&self) -> Result<Arc<dyn Classifier>, InferenceError> {
        match self {
            ModelState::Ready(classifier) => Ok(classifier.clone()),
            ModelState::NotLoaded => Err(InferenceError::NotLoaded),
            ModelState::Unavailable(reason) => Err(InferenceError::Unavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Returns the same probabilities for every input.
    pub struct FixedClassifier(pub Vec<f32>);

    impl Classifier for FixedClassifier {
        fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            assert_eq!(input.shape(), &[1, 128, 128, 3]);
            Ok(self.0.clone())
        }
    }

    pub fn ready(probabilities: Vec<f32>) -> ModelState {
        ModelState::Ready(Arc::new(FixedClassifier(probabilities)))
    }
}
