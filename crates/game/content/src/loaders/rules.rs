//! Combat rule overrides loaded from TOML.
//!
//! Any subset of [`CombatRules`] fields may be given; the rest keep their
//! defaults. A rule set with a mistyped field or one that fails validation is
//! reported and replaced by the defaults as a whole; only a TOML syntax error
//! fails the file.

use std::path::Path;

use combat_core::config::CombatRules;

use crate::loaders::{Diagnostics, LoadResult, read_file};

/// Loader for combat rules from TOML files.
pub struct RulesLoader;

impl RulesLoader {
    pub fn load(path: &Path, diagnostics: &mut Diagnostics<'_>) -> LoadResult<CombatRules> {
        let content = read_file(path)?;
        Self::parse(&content, diagnostics)
    }

    pub fn parse(content: &str, diagnostics: &mut Diagnostics<'_>) -> LoadResult<CombatRules> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))?;

        let rules = match toml::Value::Table(table).try_into::<CombatRules>() {
            Ok(rules) => rules,
            Err(e) => {
                diagnostics.report("rules", format!("malformed rules: {e}"));
                return Ok(CombatRules::default());
            }
        };
        match validate(&rules) {
            Ok(()) => Ok(rules),
            Err(message) => {
                diagnostics.report("rules", message);
                Ok(CombatRules::default())
            }
        }
    }
}

fn validate(rules: &CombatRules) -> Result<(), String> {
    let factors = [
        ("crit_chance", rules.crit_chance),
        ("crit_multiplier", rules.crit_multiplier),
        ("graze_multiplier", rules.graze_multiplier),
        ("variance_min", rules.variance_min),
        ("variance_max", rules.variance_max),
        ("multi_target_factor", rules.multi_target_factor),
        ("offense_buff_multiplier", rules.offense_buff_multiplier),
        ("defense_buff_multiplier", rules.defense_buff_multiplier),
        ("frozen_vulnerability", rules.frozen_vulnerability),
        ("blind_accuracy_multiplier", rules.blind_accuracy_multiplier),
        ("weakened_multiplier", rules.weakened_multiplier),
        ("slowed_multiplier", rules.slowed_multiplier),
    ];
    for (name, value) in factors {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{name} must be a finite value >= 0, got {value}"));
        }
    }
    if rules.crit_chance > 1.0 {
        return Err(format!("crit_chance {} exceeds 1.0", rules.crit_chance));
    }
    if rules.variance_min > rules.variance_max {
        return Err(format!(
            "variance_min {} exceeds variance_max {}",
            rules.variance_min, rules.variance_max
        ));
    }
    if rules.defense_buff_multiplier == 0.0 {
        return Err("defense_buff_multiplier must not be zero".to_string());
    }
    if rules.burn_divisor == 0 || rules.poison_divisor == 0 || rules.regeneration_divisor == 0 {
        return Err("status divisors must be at least 1".to_string());
    }
    Ok(())
}
