pub mod classifier;
pub mod heuristic;
pub mod naive_bayes;

pub use classifier::Classifier;
pub use heuristic::HeuristicClassifier;
pub use naive_bayes::{
    FeatureDistribution, InformativeFeature, LabelPrior, ModelArtifact, NaiveBayes,
};
