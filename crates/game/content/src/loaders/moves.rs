//! Move catalog loader.
//!
//! Moves reference abilities by id, so the ability catalog is loaded first.
//! An unknown ability id is reported and dropped; the move itself still loads.

use std::path::Path;

use combat_core::action::{
    Accuracy, AiHint, EffectTarget, Impact, MoveDef, MoveEffect, MoveTags, TargetKind,
};
use combat_core::env::{AbilityCatalog, MoveCatalog};
use combat_core::state::StatusKind;
use combat_core::stats::Stat;
use serde::Deserialize;

use crate::loaders::{
    Diagnostics, LoadResult, id_label, narrow, parse_entries, parse_named, percent, read_file,
};

/// Raw move entry as written in `moves.ron`.
#[derive(Clone, Debug, Deserialize)]
pub struct MoveRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub power: i64,
    /// `None` never misses.
    #[serde(default)]
    pub accuracy: Option<i64>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_impact")]
    pub impact: String,
    /// Overrides the attribute implied by `impact`.
    #[serde(default)]
    pub offense: Option<String>,
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub elements: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub mana_cost: i64,
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub ai_hint: Option<String>,
}

/// Raw secondary effect.
#[derive(Clone, Debug, Deserialize)]
pub struct EffectRecord {
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub stat: Option<String>,
    #[serde(default)]
    pub stages: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default = "always")]
    pub chance: i64,
    #[serde(default)]
    pub percent: i64,
    #[serde(default)]
    pub target: Option<String>,
}

fn default_impact() -> String {
    "physical".to_string()
}

fn default_target() -> String {
    "single_enemy".to_string()
}

fn always() -> i64 {
    100
}

impl EffectRecord {
    fn recipient(&self, default: EffectTarget) -> Result<EffectTarget, String> {
        match &self.target {
            Some(raw) => parse_named("effect target", raw),
            None => Ok(default),
        }
    }

    pub fn validate(&self) -> Result<MoveEffect, String> {
        let effect = match self.kind.trim().to_ascii_lowercase().as_str() {
            "apply_status" => {
                let raw = self.status.as_deref().ok_or("apply_status needs a status")?;
                MoveEffect::ApplyStatus {
                    status: parse_named::<StatusKind>("status", raw)?,
                    duration: narrow("duration", self.duration)?,
                    chance_pct: percent("chance", self.chance)?,
                    target: self.recipient(EffectTarget::Target)?,
                }
            }
            "stat_stage" => {
                let raw = self.stat.as_deref().ok_or("stat_stage needs a stat")?;
                if self.stages == 0 {
                    return Err("stat_stage needs non-zero stages".to_string());
                }
                MoveEffect::StatStage {
                    stat: parse_named::<Stat>("stat", raw)?,
                    stages: narrow("stages", self.stages)?,
                    chance_pct: percent("chance", self.chance)?,
                    target: self.recipient(EffectTarget::Target)?,
                }
            }
            "heal" => MoveEffect::Heal {
                percent: percent("percent", self.percent)?,
                target: self.recipient(EffectTarget::User)?,
            },
            "recoil" => MoveEffect::Recoil {
                percent: percent("percent", self.percent)?,
            },
            "cleanse" => MoveEffect::Cleanse {
                target: self.recipient(EffectTarget::User)?,
            },
            "protect" => MoveEffect::Protect,
            "daze" => MoveEffect::Daze {
                chance_pct: percent("chance", self.chance)?,
            },
            other => return Err(format!("unknown effect kind '{other}'")),
        };
        Ok(effect)
    }
}

impl MoveRecord {
    /// Validates everything except ability references.
    pub fn validate(&self) -> Result<MoveDef, String> {
        if self.id.trim().is_empty() {
            return Err("move id is empty".to_string());
        }
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());

        let accuracy = match self.accuracy {
            None => Accuracy::TrueHit,
            Some(raw) if (1..=100).contains(&raw) => Accuracy::Percent(narrow("accuracy", raw)?),
            Some(raw) => return Err(format!("accuracy {raw} must be within 1..=100 or omitted")),
        };

        let mut def = MoveDef::new(&self.id, name)
            .with_power(narrow("power", self.power)?)
            .with_accuracy(accuracy)
            .with_priority(narrow("priority", self.priority)?)
            .with_impact(parse_named::<Impact>("impact", &self.impact)?)
            .with_target(parse_named::<TargetKind>("target", &self.target)?)
            .with_mana_cost(narrow("mana_cost", self.mana_cost)?);

        if let Some(raw) = &self.offense {
            def.offense = parse_named("offense", raw)?;
        }
        for element in &self.elements {
            if element.trim().is_empty() {
                return Err("empty element name".to_string());
            }
            def = def.with_element(element.as_str());
        }
        for flag in &self.flags {
            let tag = match flag.trim().to_ascii_lowercase().as_str() {
                "self_destruct" => MoveTags::SELF_DESTRUCT,
                "piercing" => MoveTags::PIERCING,
                other => return Err(format!("unknown flag '{other}'")),
            };
            def = def.with_tags(tag);
        }
        for effect in &self.effects {
            def = def.with_effect(effect.validate()?);
        }
        if let Some(raw) = &self.ai_hint {
            def = def.with_hint(parse_named::<AiHint>("ai hint", raw)?);
        }
        Ok(def)
    }
}

/// Loader for move catalogs from RON files.
pub struct MoveLoader;

impl MoveLoader {
    /// Load a move catalog from a RON file.
    pub fn load(
        path: &Path,
        abilities: &AbilityCatalog,
        diagnostics: &mut Diagnostics<'_>,
    ) -> LoadResult<MoveCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, abilities, diagnostics)
    }

    /// Parse a move catalog from RON text.
    ///
    /// Duplicate ids keep the first definition.
    pub fn parse(
        content: &str,
        abilities: &AbilityCatalog,
        diagnostics: &mut Diagnostics<'_>,
    ) -> LoadResult<MoveCatalog> {
        let records: Vec<MoveRecord> =
            parse_entries(content, "move catalog", diagnostics, id_label)?;

        let mut catalog = MoveCatalog::new();
        for record in records {
            let mut def = match record.validate() {
                Ok(def) => def,
                Err(message) => {
                    diagnostics.report(&record.id, message);
                    continue;
                }
            };
            if catalog.contains(&def.id) {
                diagnostics.report(&record.id, "duplicate move id");
                continue;
            }
            for ability in &record.abilities {
                match abilities.get(ability) {
                    Some(found) => def = def.with_ability(found),
                    None => diagnostics.report(
                        &record.id,
                        format!("unknown ability '{ability}' ignored"),
                    ),
                }
            }
            catalog.insert(def);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::abilities::{AbilityDef, AbilityKind};

    use super::*;
    use crate::loaders::Diagnostic;

    fn parse(text: &str, abilities: &AbilityCatalog) -> (MoveCatalog, Vec<Diagnostic>) {
        let mut items = Vec::new();
        let catalog = {
            let mut diagnostics = Diagnostics::new("moves.ron", &mut items);
            MoveLoader::parse(text, abilities, &mut diagnostics).expect("valid RON")
        };
        (catalog, items)
    }

    #[test]
    fn builds_typed_move() {
        let (catalog, diagnostics) = parse(
            r#"[
                (
                    id: "Ember",
                    power: 40,
                    accuracy: Some(95),
                    impact: "magical",
                    elements: ["fire"],
                    mana_cost: 4,
                    effects: [(kind: "apply_status", status: Some("burned"), chance: 10)],
                    ai_hint: Some("finisher"),
                ),
            ]"#,
            &AbilityCatalog::new(),
        );
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let ember = catalog.get("ember").expect("ember loaded");
        assert_eq!(ember.name, "Ember");
        assert_eq!(ember.accuracy, Accuracy::Percent(95));
        assert_eq!(ember.offense, Stat::Intelligence);
        assert_eq!(ember.mana_cost, 4);
        assert_eq!(ember.ai_hint, Some(AiHint::Finisher));
        assert_eq!(
            ember.effects,
            vec![MoveEffect::ApplyStatus {
                status: StatusKind::Burned,
                duration: 0,
                chance_pct: 10,
                target: EffectTarget::Target,
            }]
        );
    }

    #[test]
    fn unknown_ability_is_dropped_but_move_loads() {
        let abilities: AbilityCatalog = [AbilityDef::new(
            "sharp",
            AbilityKind::KeenEye { multiplier_pct: 100 },
        )]
        .into_iter()
        .collect();
        let (catalog, diagnostics) = parse(
            r#"[(id: "slash", power: 50, abilities: ["sharp", "ghost"])]"#,
            &abilities,
        );
        let slash = catalog.get("slash").expect("slash loaded");
        assert_eq!(slash.abilities.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("ghost"));
    }

    #[test]
    fn invalid_moves_are_skipped() {
        let (catalog, diagnostics) = parse(
            r#"[
                (id: "wild", power: 10, accuracy: Some(0)),
                (id: "negative", power: -5),
                (id: "odd", target: "everyone"),
                (id: "fizzle", effects: [(kind: "explode")]),
                (id: "tackle", power: 40),
            ]"#,
            &AbilityCatalog::new(),
        );
        assert_eq!(catalog.keys(), ["tackle"]);
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn mistyped_power_skips_only_that_move() {
        let (catalog, diagnostics) = parse(
            r#"[
                (id: "mighty", power: "strong"),
                (id: "jab", power: 30, effects: [(kind: "recoil", percent: "lots")]),
                (id: "tackle", power: 40),
            ]"#,
            &AbilityCatalog::new(),
        );
        assert_eq!(catalog.keys(), ["tackle"]);
        let entries: Vec<&str> = diagnostics.iter().map(|d| d.entry.as_str()).collect();
        assert_eq!(entries, ["mighty", "jab"]);
    }
}
