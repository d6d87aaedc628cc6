use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use gendercast_core::{Distribution, FeatureMapping, GenderCastError, Prediction, Result};
use gendercast_models::{Classifier, HeuristicClassifier, InformativeFeature, NaiveBayes};

use crate::config::ShellConfig;

enum Backend {
    Model {
        classifier: Arc<dyn Classifier>,
        naive_bayes: Option<Arc<NaiveBayes>>,
    },
    /// Heuristic installed after a failed load. `reason` is that failure.
    Fallback {
        classifier: Arc<dyn Classifier>,
        reason: String,
    },
    Unavailable {
        reason: String,
    },
}

/// Process-wide handle to the loaded model.
///
/// Built once at startup and passed to whatever handles requests. Read-only
/// after construction.
pub struct ClassifierAdapter {
    backend: Backend,
}

impl ClassifierAdapter {
    /// Loads a Naive Bayes artifact. Any failure is returned to the caller.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let model = Arc::new(NaiveBayes::load(path)?);

        Ok(Self {
            backend: Backend::Model {
                classifier: model.clone(),
                naive_bayes: Some(model),
            },
        })
    }

    /// Loads the configured model, degrading to an unavailable adapter (or
    /// the heuristic stand-in, when allowed) if that fails.
    pub fn from_config(config: &ShellConfig) -> Self {
        match Self::load(&config.model_path) {
            Ok(adapter) => adapter,
            Err(err) if config.allow_fallback => {
                warn!(
                    path = %config.model_path.display(),
                    error = %err,
                    "model load failed; heuristic stand-in installed, predictions are not from a trained model"
                );
                Self::fallback(err.to_string())
            }
            Err(err) => {
                warn!(
                    path = %config.model_path.display(),
                    error = %err,
                    "model load failed; predictions unavailable"
                );
                Self::unavailable(err.to_string())
            }
        }
    }

    pub fn with_classifier(classifier: impl Classifier + 'static) -> Self {
        info!(backend = classifier.describe(), "classifier installed");

        Self {
            backend: Backend::Model {
                classifier: Arc::new(classifier),
                naive_bayes: None,
            },
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            backend: Backend::Fallback {
                classifier: Arc::new(HeuristicClassifier::new()),
                reason: reason.into(),
            },
        }
    }

    /// True only when a real model is loaded.
    pub fn is_available(&self) -> bool {
        matches!(self.backend, Backend::Model { .. })
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.backend, Backend::Fallback { .. })
    }

    /// Why no real model is loaded, if it isn't.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.backend {
            Backend::Model { .. } => None,
            Backend::Fallback { reason, .. } | Backend::Unavailable { reason } => {
                Some(reason.as_str())
            }
        }
    }

    pub fn classify(&self, features: &FeatureMapping) -> Result<Prediction> {
        match &self.backend {
            Backend::Model { classifier, .. } => {
                let label = classifier.classify(features)?;
                debug!(label = %label, backend = classifier.describe(), "classified");
                Ok(Prediction::from_model(label))
            }
            Backend::Fallback { classifier, reason } => {
                let label = classifier.classify(features)?;
                warn!(
                    label = %label,
                    reason = %reason,
                    "heuristic stand-in used; not a model prediction"
                );
                Ok(Prediction::from_heuristic(label))
            }
            Backend::Unavailable { reason } => Err(GenderCastError::unavailable(reason.clone())),
        }
    }

    pub fn probabilities(&self, features: &FeatureMapping) -> Option<Result<Distribution>> {
        match &self.backend {
            Backend::Model { classifier, .. } => classifier.prob_classify(features),
            Backend::Fallback { .. } => None,
            Backend::Unavailable { reason } => {
                Some(Err(GenderCastError::unavailable(reason.clone())))
            }
        }
    }

    /// Ranked feature values of the loaded Naive Bayes model.
    pub fn most_informative_features(&self, n: usize) -> Result<Vec<InformativeFeature>> {
        match &self.backend {
            Backend::Model {
                naive_bayes: Some(model),
                ..
            } => Ok(model.most_informative_features(n)),
            Backend::Model { classifier, .. } => Err(GenderCastError::ClassifierFailure(format!(
                "{} backend cannot be inspected",
                classifier.describe()
            ))),
            Backend::Fallback { reason, .. } | Backend::Unavailable { reason } => {
                Err(GenderCastError::unavailable(reason.clone()))
            }
        }
    }
}
