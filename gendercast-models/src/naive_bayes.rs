use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use gendercast_core::prob::{argmax_by, normalize_log_scores};
use gendercast_core::{
    Distribution, FeatureMapping, Float, GenderCastError, Label, Result, Vector,
};

use crate::classifier::Classifier;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// On-disk form of a trained categorical Naive Bayes model.
///
/// All probabilities are natural logarithms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Label priors.
    pub labels: Vec<LabelPrior>,
    /// One value distribution per (label, feature name).
    #[serde(default)]
    pub features: Vec<FeatureDistribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrior {
    pub label: Label,
    pub log_prob: Float,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDistribution {
    pub label: Label,
    pub feature: String,
    pub values: BTreeMap<String, Float>,
    /// Log probability of any value not listed in `values`.
    pub unseen: Float,
}

#[derive(Debug, Clone)]
struct ValueDistribution {
    values: HashMap<String, Float>,
    unseen: Float,
}

impl ValueDistribution {
    fn log_prob(&self, value: &str) -> Float {
        self.values.get(value).copied().unwrap_or(self.unseen)
    }
}

/// A `(feature, value)` pair whose probability differs most between labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformativeFeature {
    pub feature: String,
    pub value: String,
    /// `max_label P(value | label) / min_label P(value | label)`.
    pub ratio: Float,
    pub favoured: Label,
    pub disfavoured: Label,
}

/// **Categorical Naive Bayes** classifier evaluated from a pre-trained
/// [`ModelArtifact`].
///
/// Each feature value is assumed conditionally independent given the label,
/// so the posterior is proportional to
///
/// ```text
/// P(label) · Π_f P(f = v_f | label)
/// ```
///
/// computed as a sum of logs.
///
/// # Decision rule
///
/// 1. Feature names that no label has a distribution for are ignored.
/// 2. For each remaining feature, a label with a distribution adds the log
///    probability of the observed value (or its `unseen` log probability);
///    a label with no distribution for that feature scores `-∞`.
/// 3. The highest score wins; on a tie the lexicographically largest label wins.
///
/// Training is out of scope: models are produced elsewhere and loaded with
/// [`NaiveBayes::load`] or [`NaiveBayes::from_artifact`].
///
/// # Errors
///
/// - [`GenderCastError::Io`] if the artifact cannot be read
/// - [`GenderCastError::MalformedArtifact`] if it is not valid JSON of the right shape
/// - [`GenderCastError::InvalidArtifact`] if it violates a model invariant
/// - [`GenderCastError::ClassifierFailure`] if every label has zero probability
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    labels: Vec<Label>,
    priors: Vector,
    /// Indexed like `labels`; keyed by feature name.
    distributions: Vec<HashMap<String, ValueDistribution>>,
    known_features: HashSet<String>,
}

impl NaiveBayes {
    /// Reads and validates a JSON model artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = std::fs::read_to_string(path).map_err(|err| GenderCastError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        let model = Self::from_json(&raw)?;

        info!(
            path = %path.display(),
            labels = model.labels.len(),
            features = model.known_features.len(),
            "loaded naive bayes model"
        );

        Ok(model)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(raw)
            .map_err(|err| GenderCastError::MalformedArtifact(err.to_string()))?;

        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        if artifact.labels.is_empty() {
            return Err(GenderCastError::InvalidArtifact(
                "model has no labels".into(),
            ));
        }

        let mut index: HashMap<Label, usize> = HashMap::new();
        let mut labels = Vec::with_capacity(artifact.labels.len());
        let mut priors = Vec::with_capacity(artifact.labels.len());

        for prior in artifact.labels {
            check_log_prob(prior.log_prob, || format!("prior of `{}`", prior.label))?;

            if index.insert(prior.label.clone(), labels.len()).is_some() {
                return Err(GenderCastError::InvalidArtifact(format!(
                    "duplicate label `{}`",
                    prior.label
                )));
            }

            labels.push(prior.label);
            priors.push(prior.log_prob);
        }

        let mut distributions: Vec<HashMap<String, ValueDistribution>> =
            vec![HashMap::new(); labels.len()];
        let mut known_features = HashSet::new();

        for dist in artifact.features {
            let Some(&i) = index.get(&dist.label) else {
                return Err(GenderCastError::InvalidArtifact(format!(
                    "feature `{}` refers to unknown label `{}`",
                    dist.feature, dist.label
                )));
            };

            check_log_prob(dist.unseen, || {
                format!("unseen value of `{}` for `{}`", dist.feature, dist.label)
            })?;
            for (value, &lp) in &dist.values {
                check_log_prob(lp, || {
                    format!("`{}` = `{}` for `{}`", dist.feature, value, dist.label)
                })?;
            }

            if distributions[i].contains_key(&dist.feature) {
                return Err(GenderCastError::InvalidArtifact(format!(
                    "duplicate distribution for (`{}`, `{}`)",
                    dist.label, dist.feature
                )));
            }

            known_features.insert(dist.feature.clone());
            distributions[i].insert(
                dist.feature,
                ValueDistribution {
                    values: dist.values.into_iter().collect(),
                    unseen: dist.unseen,
                },
            );
        }

        Ok(Self {
            labels,
            priors: Vector::from_vec(priors),
            distributions,
            known_features,
        })
    }

    /// Rebuilds an artifact equivalent to the one this model was loaded from.
    pub fn to_artifact(&self) -> ModelArtifact {
        let labels = self
            .labels
            .iter()
            .zip(self.priors.iter())
            .map(|(label, &log_prob)| LabelPrior {
                label: label.clone(),
                log_prob,
            })
            .collect();

        let mut features = Vec::new();
        for (label, dists) in self.labels.iter().zip(&self.distributions) {
            let mut names: Vec<&String> = dists.keys().collect();
            names.sort();

            for name in names {
                let dist = &dists[name];
                features.push(FeatureDistribution {
                    label: label.clone(),
                    feature: name.clone(),
                    values: dist.values.iter().map(|(k, &v)| (k.clone(), v)).collect(),
                    unseen: dist.unseen,
                });
            }
        }

        ModelArtifact { labels, features }
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Unnormalized log-posterior per label, in label order.
    pub fn log_scores(&self, features: &FeatureMapping) -> Vector {
        let mut scores = self.priors.clone();

        for (key, value) in features.iter() {
            let name = key.as_str();

            if !self.known_features.contains(name) {
                continue;
            }

            for (i, dists) in self.distributions.iter().enumerate() {
                scores[i] += match dists.get(name) {
                    Some(dist) => dist.log_prob(value),
                    None => Float::NEG_INFINITY,
                };
            }
        }

        scores
    }

    pub fn classify_many(&self, batch: &[FeatureMapping]) -> Vec<Result<Label>> {
        #[cfg(feature = "parallel")]
        {
            batch.par_iter().map(|f| self.classify(f)).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            batch.iter().map(|f| self.classify(f)).collect()
        }
    }

    /// Up to `n` feature values ranked by how strongly they separate labels.
    ///
    /// Labels without a distribution for a feature are skipped for that
    /// feature; values a label never saw use its `unseen` probability.
    /// Pairs where some label assigns zero probability are dropped.
    pub fn most_informative_features(&self, n: usize) -> Vec<InformativeFeature> {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for dists in &self.distributions {
            for (name, dist) in dists {
                for value in dist.values.keys() {
                    if seen.insert((name.as_str(), value.as_str())) {
                        pairs.push((name.as_str(), value.as_str()));
                    }
                }
            }
        }

        let mut ranked: Vec<InformativeFeature> = pairs
            .into_iter()
            .filter_map(|(name, value)| self.informative(name, value))
            .collect();

        ranked.sort_by(|a, b| {
            b.ratio
                .total_cmp(&a.ratio)
                .then_with(|| a.feature.cmp(&b.feature))
                .then_with(|| a.value.cmp(&b.value))
        });
        ranked.truncate(n);

        ranked
    }

    fn informative(&self, name: &str, value: &str) -> Option<InformativeFeature> {
        let mut max: Option<(usize, Float)> = None;
        let mut min: Option<(usize, Float)> = None;

        for (i, dists) in self.distributions.iter().enumerate() {
            let Some(dist) = dists.get(name) else {
                continue;
            };
            let p = dist.log_prob(value).exp();

            if max.map_or(true, |(_, m)| p > m) {
                max = Some((i, p));
            }
            if min.map_or(true, |(_, m)| p < m) {
                min = Some((i, p));
            }
        }

        let ((hi, p_max), (lo, p_min)) = (max?, min?);
        if p_min <= 0.0 {
            return None;
        }

        Some(InformativeFeature {
            feature: name.to_string(),
            value: value.to_string(),
            ratio: p_max / p_min,
            favoured: self.labels[hi].clone(),
            disfavoured: self.labels[lo].clone(),
        })
    }
}

impl Classifier for NaiveBayes {
    fn classify(&self, features: &FeatureMapping) -> Result<Label> {
        let scores = self.log_scores(features);

        let best = argmax_by(&scores, |a, b| self.labels[a] > self.labels[b])
            .filter(|&i| scores[i] > Float::NEG_INFINITY)
            .ok_or_else(|| {
                GenderCastError::ClassifierFailure("no label has non-zero probability".into())
            })?;

        debug!(label = %self.labels[best], score = scores[best], "naive bayes decision");

        Ok(self.labels[best].clone())
    }

    fn prob_classify(&self, features: &FeatureMapping) -> Option<Result<Distribution>> {
        let scores = self.log_scores(features);

        let result = normalize_log_scores(&scores)
            .map(|probs| {
                Distribution::new(
                    self.labels
                        .iter()
                        .cloned()
                        .zip(probs.iter().copied())
                        .collect(),
                )
            })
            .ok_or_else(|| {
                GenderCastError::ClassifierFailure("no label has non-zero probability".into())
            });

        Some(result)
    }

    fn describe(&self) -> &str {
        "naive bayes"
    }
}

fn check_log_prob(lp: Float, what: impl FnOnce() -> String) -> Result<()> {
    if lp.is_nan() || lp > 0.0 {
        return Err(GenderCastError::InvalidArtifact(format!(
            "log probability {lp} of {} must be <= 0",
            what()
        )));
    }
    Ok(())
}
