use std::fmt;

use serde::{Deserialize, Serialize};

pub type Float = f64;
pub type Vector = nalgebra::DVector<Float>;

/// A category produced by a classifier.
///
/// The vocabulary belongs to whatever model was loaded, so this is an open
/// string newtype rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<str> for Label {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Label {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Where a [`Prediction`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// The loaded, trained model.
    Model,
    /// The stand-in heuristic. Never a trained prediction.
    Heuristic,
}

impl PredictionSource {
    pub fn is_model(self) -> bool {
        matches!(self, Self::Model)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    pub source: PredictionSource,
}

impl Prediction {
    pub fn from_model(label: Label) -> Self {
        Self {
            label,
            source: PredictionSource::Model,
        }
    }

    pub fn from_heuristic(label: Label) -> Self {
        Self {
            label,
            source: PredictionSource::Heuristic,
        }
    }
}

/// Normalized per-label probabilities, in the classifier's label order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    entries: Vec<(Label, Float)>,
}

impl Distribution {
    pub fn new(entries: Vec<(Label, Float)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(Label, Float)] {
        &self.entries
    }

    pub fn probability(&self, label: &str) -> Option<Float> {
        self.entries
            .iter()
            .find(|(l, _)| l.as_str() == label)
            .map(|(_, p)| *p)
    }

    /// Most probable label. On equal probability the larger label wins.
    pub fn max(&self) -> Option<&Label> {
        let mut best: Option<&(Label, Float)> = None;
        for entry in &self.entries {
            match best {
                Some((l, p)) if entry.1 < *p || (entry.1 == *p && entry.0 <= *l) => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(l, _)| l)
    }
}
