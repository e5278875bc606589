use std::collections::HashMap;
use std::fmt;

use super::catalog::normalize_key;

/// Case-insensitive element identifier (stored lowercase).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: &str) -> Self {
        Self(normalize_key(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ElementId> for String {
    fn from(value: ElementId) -> Self {
        value.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sparse elemental interaction matrix.
///
/// Maps (offensive element, defensive element) to a damage factor. Missing
/// pairs are neutral (1.0). Values above 1 are weaknesses, below 1
/// resistances, and 0 is immunity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementMatrix {
    entries: HashMap<(ElementId, ElementId), f64>,
}

impl ElementMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the factor for one pair, replacing any previous value.
    pub fn insert(&mut self, offense: ElementId, defense: ElementId, factor: f64) {
        self.entries.insert((offense, defense), factor);
    }

    /// Builder form of [`Self::insert`].
    pub fn with(mut self, offense: &str, defense: &str, factor: f64) -> Self {
        self.insert(ElementId::new(offense), ElementId::new(defense), factor);
        self
    }

    /// Factor for a single pair, 1.0 when absent.
    pub fn factor(&self, offense: &ElementId, defense: &ElementId) -> f64 {
        self.entries
            .get(&(offense.clone(), defense.clone()))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of the factor over every (offense × defense) pair.
    pub fn effectiveness(&self, offense: &[ElementId], defense: &[ElementId]) -> f64 {
        offense
            .iter()
            .flat_map(|o| defense.iter().map(move |d| (o, d)))
            .map(|(o, d)| self.factor(o, d))
            .product()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
