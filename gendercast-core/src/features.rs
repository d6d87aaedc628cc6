use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::GenderCastError;

/// The eleven keys of a [`FeatureMapping`], in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKey {
    Suffix,
    Suffix2,
    Suffix3,
    Suffix4,
    Suffix5,
    Suffix6,
    Prefix,
    Prefix2,
    Prefix3,
    Prefix4,
    Prefix5,
}

impl FeatureKey {
    pub const COUNT: usize = 11;

    pub const ALL: [FeatureKey; Self::COUNT] = [
        FeatureKey::Suffix,
        FeatureKey::Suffix2,
        FeatureKey::Suffix3,
        FeatureKey::Suffix4,
        FeatureKey::Suffix5,
        FeatureKey::Suffix6,
        FeatureKey::Prefix,
        FeatureKey::Prefix2,
        FeatureKey::Prefix3,
        FeatureKey::Prefix4,
        FeatureKey::Prefix5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::Suffix => "suffix",
            FeatureKey::Suffix2 => "suffix2",
            FeatureKey::Suffix3 => "suffix3",
            FeatureKey::Suffix4 => "suffix4",
            FeatureKey::Suffix5 => "suffix5",
            FeatureKey::Suffix6 => "suffix6",
            FeatureKey::Prefix => "prefix",
            FeatureKey::Prefix2 => "prefix2",
            FeatureKey::Prefix3 => "prefix3",
            FeatureKey::Prefix4 => "prefix4",
            FeatureKey::Prefix5 => "prefix5",
        }
    }

    /// Number of characters this key slices off the name.
    pub fn width(self) -> usize {
        match self {
            FeatureKey::Suffix | FeatureKey::Prefix => 1,
            FeatureKey::Suffix2 | FeatureKey::Prefix2 => 2,
            FeatureKey::Suffix3 | FeatureKey::Prefix3 => 3,
            FeatureKey::Suffix4 | FeatureKey::Prefix4 => 4,
            FeatureKey::Suffix5 | FeatureKey::Prefix5 => 5,
            FeatureKey::Suffix6 => 6,
        }
    }

    pub fn is_suffix(self) -> bool {
        matches!(
            self,
            FeatureKey::Suffix
                | FeatureKey::Suffix2
                | FeatureKey::Suffix3
                | FeatureKey::Suffix4
                | FeatureKey::Suffix5
                | FeatureKey::Suffix6
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = GenderCastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| GenderCastError::InvalidArtifact(format!("unknown feature key `{s}`")))
    }
}

/// Fixed-shape feature set derived from a single name.
///
/// Always holds exactly one value per [`FeatureKey`]. Built only through
/// [`extract_gender_features`] and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureMapping {
    values: [String; FeatureKey::COUNT],
}

impl FeatureMapping {
    pub fn get(&self, key: FeatureKey) -> &str {
        &self.values[key.index()]
    }

    /// Looks a value up by its key name, e.g. `"suffix2"`.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        name.parse::<FeatureKey>().ok().map(|key| self.get(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &str)> + '_ {
        FeatureKey::ALL
            .into_iter()
            .map(move |key| (key, self.values[key.index()].as_str()))
    }

    pub fn len(&self) -> usize {
        FeatureKey::COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Serialize for FeatureMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FeatureKey::COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// Maps a name to its suffix/prefix features.
///
/// The name is lower-cased first, then sliced by `char`:
///
/// - `suffixK` (K = 1..6) is the last K characters
/// - `prefixK` (K = 1..5) is the first K characters
///
/// When the name is shorter than K, the value falls back to the first
/// character of the name, so every value is non-empty for any non-empty
/// input.
///
/// Callers are expected to reject empty names beforehand. An empty name
/// does not panic; it produces empty values.
///
/// # Examples
///
/// ```rust
/// use gendercast_core::{extract_gender_features, FeatureKey};
///
/// let features = extract_gender_features("Ann");
/// assert_eq!(features.get(FeatureKey::Suffix3), "ann");
/// assert_eq!(features.get(FeatureKey::Suffix4), "a");
/// ```
pub fn extract_gender_features(name: &str) -> FeatureMapping {
    let lowered: Vec<char> = name.to_lowercase().chars().collect();

    FeatureMapping {
        values: FeatureKey::ALL.map(|key| slice_feature(&lowered, key)),
    }
}

fn slice_feature(chars: &[char], key: FeatureKey) -> String {
    let n = chars.len();
    let k = key.width();

    if n == 0 {
        return String::new();
    }

    if n >= k {
        if key.is_suffix() {
            chars[n - k..].iter().collect()
        } else {
            chars[..k].iter().collect()
        }
    } else {
        chars[0].to_string()
    }
}
