use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Snapshot of one filter toggle control on the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToggle {
    pub name: String,
    pub active: bool,
}

impl FilterToggle {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
        }
    }
}

/// The set of enabled output filters. Serialized on the wire and in saved
/// layout state as a `name -> true` mapping; disabled filters are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    enabled: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the active subset out of the panel's toggle controls. No side
    /// effects; called at construction when no restored filter state exists
    /// and again whenever a toggle changes.
    pub fn from_toggles(toggles: &[FilterToggle]) -> Self {
        toggles
            .iter()
            .filter(|toggle| toggle.active)
            .map(|toggle| toggle.name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

impl FromIterator<String> for FilterSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FilterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.enabled.len()))?;
        for name in &self.enabled {
            map.serialize_entry(name, &true)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, bool>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| name)
            .collect())
    }
}
