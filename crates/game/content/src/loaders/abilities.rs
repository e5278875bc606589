//! Ability catalog loader.
//!
//! Each record names its kind and carries the parameters that kind needs.
//! Integer parameters live in `params`; stat, element, status and impact
//! references are given by name.
//!
//! ```ron
//! [
//!     (id: "blaze", kind: "elemental_boost", element: Some("fire"), params: {"bonus_pct": 50}),
//!     (id: "thick_hide", kind: "damage_reduction", impact: Some("physical"), params: {"percent": 25}),
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use combat_core::abilities::{AbilityDef, AbilityKind};
use combat_core::action::Impact;
use combat_core::env::{AbilityCatalog, ElementId};
use combat_core::state::StatusKind;
use combat_core::stats::Stat;
use serde::Deserialize;

use crate::loaders::{
    Diagnostics, LoadResult, id_label, narrow, parse_entries, parse_named, percent, read_file,
};

/// Raw ability entry as written in `abilities.ron`.
#[derive(Clone, Debug, Deserialize)]
pub struct AbilityRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub kind: String,
    #[serde(default)]
    pub stat: Option<String>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<(String, i64)>,
    #[serde(default)]
    pub params: HashMap<String, i64>,
}

impl AbilityRecord {
    fn param(&self, name: &str) -> Result<i64, String> {
        self.params
            .get(name)
            .copied()
            .ok_or_else(|| format!("missing parameter '{name}'"))
    }

    fn param_or(&self, name: &str, default: i64) -> i64 {
        self.params.get(name).copied().unwrap_or(default)
    }

    fn stat(&self) -> Result<Stat, String> {
        let raw = self.stat.as_deref().ok_or("missing field 'stat'")?;
        parse_named("stat", raw)
    }

    fn status(&self) -> Result<StatusKind, String> {
        let raw = self.status.as_deref().ok_or("missing field 'status'")?;
        parse_named("status", raw)
    }

    /// Validates the record into a typed ability kind.
    pub fn validate(&self) -> Result<AbilityDef, String> {
        if self.id.trim().is_empty() {
            return Err("ability id is empty".to_string());
        }
        let kind = match self.kind.trim().to_ascii_lowercase().as_str() {
            "stat_modifier" => {
                if self.modifiers.is_empty() {
                    return Err("stat_modifier needs at least one modifier".to_string());
                }
                let modifiers = self
                    .modifiers
                    .iter()
                    .map(|(stat, value)| -> Result<(Stat, i32), String> {
                        Ok((parse_named("stat", stat)?, narrow("modifier", *value)?))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                AbilityKind::StatModifier { modifiers }
            }
            "cornered" => AbilityKind::Cornered {
                stat: self.stat()?,
                hp_threshold_pct: percent("hp_threshold_pct", self.param("hp_threshold_pct")?)?,
                enemy_count_threshold: narrow(
                    "enemy_count_threshold",
                    self.param("enemy_count_threshold")?,
                )?,
                bonus_pct: narrow("bonus_pct", self.param("bonus_pct")?)?,
            },
            "low_hp_damage_bonus" => AbilityKind::LowHpDamageBonus {
                threshold_pct: percent("threshold_pct", self.param("threshold_pct")?)?,
                bonus_pct: narrow("bonus_pct", self.param("bonus_pct")?)?,
            },
            "damage_reduction" => AbilityKind::DamageReduction {
                percent: percent("percent", self.param("percent")?)?,
                impact: self
                    .impact
                    .as_deref()
                    .map(|raw| parse_named::<Impact>("impact", raw))
                    .transpose()?,
            },
            "elemental_boost" => {
                let element = self.element.as_deref().ok_or("missing field 'element'")?;
                AbilityKind::ElementalBoost {
                    element: ElementId::new(element),
                    bonus_pct: narrow("bonus_pct", self.param("bonus_pct")?)?,
                }
            }
            "keen_eye" => AbilityKind::KeenEye {
                multiplier_pct: narrow("multiplier_pct", self.param("multiplier_pct")?)?,
            },
            "precision" => AbilityKind::Precision {
                bonus_pct: narrow("bonus_pct", self.param("bonus_pct")?)?,
            },
            "quick_strike" => AbilityKind::QuickStrike {
                priority: narrow("priority", self.param_or("priority", 1))?,
                max_hp_pct: percent("max_hp_pct", self.param_or("max_hp_pct", 100))?,
            },
            "lifesteal" => AbilityKind::Lifesteal {
                percent: percent("percent", self.param("percent")?)?,
            },
            "thorns" => AbilityKind::Thorns {
                percent: percent("percent", self.param("percent")?)?,
            },
            "bloodlust" => AbilityKind::Bloodlust {
                stat: self.stat()?,
                stages: narrow("stages", self.param_or("stages", 1))?,
            },
            "anger_point" => AbilityKind::AngerPoint {
                stat: self.stat()?,
                stages: narrow("stages", self.param_or("stages", 6))?,
            },
            "venomous" => AbilityKind::Venomous {
                status: self.status()?,
                chance_pct: percent("chance_pct", self.param("chance_pct")?)?,
                duration: narrow("duration", self.param_or("duration", 0))?,
            },
            "status_immunity" => {
                if self.statuses.is_empty() {
                    return Err("status_immunity needs at least one status".to_string());
                }
                let statuses = self
                    .statuses
                    .iter()
                    .map(|raw| parse_named("status", raw))
                    .collect::<Result<Vec<StatusKind>, String>>()?;
                AbilityKind::StatusImmunity { statuses }
            }
            "sadism" => AbilityKind::Sadism {
                heal_pct: percent("heal_pct", self.param("heal_pct")?)?,
            },
            "regeneration" => AbilityKind::Regeneration {
                percent: percent("percent", self.param("percent")?)?,
            },
            "escalation" => AbilityKind::Escalation {
                bonus_pct_per_stack: narrow(
                    "bonus_pct_per_stack",
                    self.param("bonus_pct_per_stack")?,
                )?,
                max_stacks: narrow("max_stacks", self.param("max_stacks")?)?,
            },
            "intimidate" => AbilityKind::Intimidate {
                stat: self.stat()?,
                stages: narrow("stages", self.param_or("stages", -1))?,
            },
            "vigilance" => AbilityKind::Vigilance,
            other => return Err(format!("unknown ability kind '{other}'")),
        };

        let def = AbilityDef::new(&self.id, kind);
        Ok(match &self.name {
            Some(name) => def.with_name(name.clone()),
            None => def,
        })
    }
}

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load an ability catalog from a RON file.
    pub fn load(path: &Path, diagnostics: &mut Diagnostics<'_>) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, diagnostics)
    }

    /// Parse an ability catalog from RON text.
    ///
    /// Duplicate ids keep the first definition.
    pub fn parse(content: &str, diagnostics: &mut Diagnostics<'_>) -> LoadResult<AbilityCatalog> {
        let records: Vec<AbilityRecord> =
            parse_entries(content, "ability catalog", diagnostics, id_label)?;

        let mut catalog = AbilityCatalog::new();
        for record in records {
            match record.validate() {
                Ok(def) if catalog.contains(&def.id) => {
                    diagnostics.report(&record.id, "duplicate ability id");
                }
                Ok(def) => {
                    catalog.insert(def);
                }
                Err(message) => diagnostics.report(&record.id, message),
            }
        }
        Ok(catalog)
    }
}
