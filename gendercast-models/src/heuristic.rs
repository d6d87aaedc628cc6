use gendercast_core::{FeatureKey, FeatureMapping, Label, Result};

use crate::classifier::Classifier;

const FEMALE_ENDINGS: [&str; 4] = ["a", "e", "i", "y"];

/// Last-letter rule used only as an opt-in stand-in when no trained model
/// could be loaded.
///
/// Names ending in `a`, `e`, `i` or `y` are labelled `female`, the rest
/// `male`. Its output is not a model prediction and callers must mark it
/// as such.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl Classifier for HeuristicClassifier {
    fn classify(&self, features: &FeatureMapping) -> Result<Label> {
        let last = features.get(FeatureKey::Suffix);

        let label = if FEMALE_ENDINGS.contains(&last) {
            "female"
        } else {
            "male"
        };

        Ok(Label::from(label))
    }

    fn describe(&self) -> &str {
        "heuristic stand-in"
    }
}
