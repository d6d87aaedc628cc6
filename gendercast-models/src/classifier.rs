use gendercast_core::{Distribution, FeatureMapping, Label, Result};

/// Anything that can turn a [`FeatureMapping`] into a [`Label`].
///
/// Implementations must be read-only at inference time: the same mapping
/// always yields the same label.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: &FeatureMapping) -> Result<Label>;

    /// Per-label probabilities, for classifiers that have them.
    fn prob_classify(&self, _features: &FeatureMapping) -> Option<Result<Distribution>> {
        None
    }

    /// Short human-readable backend name, used in logs.
    fn describe(&self) -> &str {
        "classifier"
    }
}

impl<F> Classifier for F
where
    F: Fn(&FeatureMapping) -> Result<Label> + Send + Sync,
{
    fn classify(&self, features: &FeatureMapping) -> Result<Label> {
        self(features)
    }

    fn describe(&self) -> &str {
        "closure"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gendercast_core::{extract_gender_features, GenderCastError};

    #[test]
    fn test_closure_is_a_classifier() {
        let stub = |_: &FeatureMapping| -> Result<Label> { Ok(Label::from("female")) };
        let label = stub.classify(&extract_gender_features("Zara")).unwrap();

        assert_eq!(label, "female");
        assert!(stub.prob_classify(&extract_gender_features("Zara")).is_none());
    }

    #[test]
    fn test_closure_errors_pass_through() {
        let broken = |_: &FeatureMapping| -> Result<Label> {
            Err(GenderCastError::ClassifierFailure("boom".into()))
        };
        let result = broken.classify(&extract_gender_features("Zara"));

        assert!(matches!(result, Err(GenderCastError::ClassifierFailure(_))));
    }
}
