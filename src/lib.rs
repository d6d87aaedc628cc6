pub mod adapter;
pub mod config;
pub mod shell;

// Re-export public API
pub use adapter::ClassifierAdapter;
pub use config::ShellConfig;
pub use shell::{Outcome, SessionSummary, Shell};

pub use gendercast_core::{
    extract_gender_features, Distribution, FeatureKey, FeatureMapping, GenderCastError, Label,
    Prediction, PredictionSource, Result,
};
pub use gendercast_models::{Classifier, HeuristicClassifier, InformativeFeature, NaiveBayes};
