//! Element interaction matrix loader.
//!
//! Only non-neutral pairs need to be listed; every other pair is 1.0.

use std::collections::HashSet;
use std::path::Path;

use combat_core::env::{ElementId, ElementMatrix, normalize_key};
use serde::Deserialize;

use crate::loaders::{Diagnostics, LoadResult, parse_entries, read_file, str_field};

/// Raw matrix entry as written in `elements.ron`.
#[derive(Clone, Debug, Deserialize)]
pub struct ElementRecord {
    pub attack: String,
    pub defense: String,
    pub factor: f64,
}

impl ElementRecord {
    fn label(&self) -> String {
        format!("{}->{}", normalize_key(&self.attack), normalize_key(&self.defense))
    }

    pub fn validate(&self) -> Result<(ElementId, ElementId, f64), String> {
        if self.attack.trim().is_empty() || self.defense.trim().is_empty() {
            return Err("element names must not be empty".to_string());
        }
        if !self.factor.is_finite() || self.factor < 0.0 {
            return Err(format!("factor {} must be a finite value >= 0", self.factor));
        }
        Ok((
            ElementId::new(&self.attack),
            ElementId::new(&self.defense),
            self.factor,
        ))
    }
}

fn pair_label(value: &ron::Value) -> Option<String> {
    let attack = str_field(value, "attack")?;
    let defense = str_field(value, "defense")?;
    Some(format!("{}->{}", normalize_key(attack), normalize_key(defense)))
}

/// Loader for the element matrix from RON files.
pub struct ElementLoader;

impl ElementLoader {
    pub fn load(path: &Path, diagnostics: &mut Diagnostics<'_>) -> LoadResult<ElementMatrix> {
        let content = read_file(path)?;
        Self::parse(&content, diagnostics)
    }

    /// Parse the matrix from RON text. A repeated pair keeps its first factor.
    pub fn parse(content: &str, diagnostics: &mut Diagnostics<'_>) -> LoadResult<ElementMatrix> {
        let records: Vec<ElementRecord> =
            parse_entries(content, "element matrix", diagnostics, pair_label)?;

        let mut matrix = ElementMatrix::new();
        let mut seen = HashSet::new();
        for record in records {
            match record.validate() {
                Ok((attack, defense, factor)) => {
                    if !seen.insert((attack.clone(), defense.clone())) {
                        diagnostics.report(&record.label(), "duplicate element pair");
                        continue;
                    }
                    matrix.insert(attack, defense, factor);
                }
                Err(message) => diagnostics.report(&record.label(), message),
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_pairs_and_rejects_bad_factors() {
        let mut items = Vec::new();
        let matrix = {
            let mut diagnostics = Diagnostics::new("elements.ron", &mut items);
            ElementLoader::parse(
                r#"[
                    (attack: "Fire", defense: "frost", factor: 2.0),
                    (attack: "storm", defense: "stone", factor: 0.0),
                    (attack: "fire", defense: "FROST", factor: 0.5),
                    (attack: "frost", defense: "fire", factor: -1.0),
                ]"#,
                &mut diagnostics,
            )
            .expect("valid RON")
        };
        assert_eq!(matrix.len(), 2);
        assert_eq!(
            matrix.factor(&ElementId::new("fire"), &ElementId::new("frost")),
            2.0
        );
        assert_eq!(
            matrix.factor(&ElementId::new("storm"), &ElementId::new("stone")),
            0.0
        );
        let entries: Vec<&str> = items.iter().map(|d| d.entry.as_str()).collect();
        assert_eq!(entries, ["fire->frost", "frost->fire"]);
    }

    #[test]
    fn mistyped_factor_is_reported_by_pair() {
        let mut items = Vec::new();
        let matrix = {
            let mut diagnostics = Diagnostics::new("elements.ron", &mut items);
            ElementLoader::parse(
                r#"[
                    (attack: "tide", defense: "fire", factor: "double"),
                    (attack: "fire", defense: "flora", factor: 2),
                ]"#,
                &mut diagnostics,
            )
            .expect("valid RON")
        };
        assert_eq!(matrix.len(), 1);
        assert_eq!(
            matrix.factor(&ElementId::new("fire"), &ElementId::new("flora")),
            2.0
        );
        let entries: Vec<&str> = items.iter().map(|d| d.entry.as_str()).collect();
        assert_eq!(entries, ["tide->fire"]);
    }
}
