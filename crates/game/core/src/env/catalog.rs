use std::collections::HashMap;
use std::sync::Arc;

use crate::abilities::AbilityDef;
use crate::action::MoveDef;

use super::elements::ElementMatrix;

/// Canonical form of a catalog key: trimmed and ASCII-lowercased.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// A definition addressable by its catalog key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for MoveDef {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for AbilityDef {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Immutable-after-load lookup table keyed case-insensitively.
#[derive(Clone, Debug)]
pub struct Catalog<T> {
    entries: HashMap<String, Arc<T>>,
}

pub type MoveCatalog = Catalog<MoveDef>;
pub type AbilityCatalog = Catalog<AbilityDef>;

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Keyed> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition under its key. Returns the definition it replaced.
    pub fn insert(&mut self, def: T) -> Option<Arc<T>> {
        let key = normalize_key(def.key());
        self.entries.insert(key, Arc::new(def))
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.get(&normalize_key(key)).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T: Keyed> FromIterator<T> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}

/// Everything a content loader produces for one battle setup.
#[derive(Clone, Debug, Default)]
pub struct Catalogs {
    pub moves: MoveCatalog,
    pub abilities: AbilityCatalog,
    pub elements: Arc<ElementMatrix>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_normalized() {
        assert_eq!(normalize_key("  Fire Bolt "), "fire bolt");
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog: MoveCatalog = [MoveDef::new("Ember", "Ember").with_power(40)]
            .into_iter()
            .collect();
        let found = catalog.get("EMBER").map(|mv| mv.power);
        assert_eq!(found, Some(40));
        assert!(catalog.contains(" ember"));
        assert!(catalog.get("frost").is_none());
    }

    #[test]
    fn insert_reports_replaced_definition() {
        let mut catalog = MoveCatalog::new();
        assert!(catalog.insert(MoveDef::new("tackle", "Tackle")).is_none());
        let replaced = catalog.insert(MoveDef::new("TACKLE", "Tackle II"));
        assert_eq!(replaced.map(|mv| mv.name.clone()), Some("Tackle".to_string()));
        assert_eq!(catalog.len(), 1);
    }
}
