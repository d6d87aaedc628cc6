pub mod error;
pub mod features;
pub mod prob;
pub mod types;

pub use types::{Distribution, Float, Label, Prediction, PredictionSource, Vector};

pub use error::{GenderCastError, Result};

pub use features::{extract_gender_features, FeatureKey, FeatureMapping};
