/// Battle configuration constants and tunable combat rules.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Balance constants used by the damage pipeline and stat derivation.
    pub rules: CombatRules,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneously active status effects per combatant.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Maximum combatants per battle (both sides, bench included).
    pub const MAX_COMBATANTS: usize = 12;
    /// Number of field slots per side.
    pub const FIELD_SLOTS: u8 = 3;

    pub fn new() -> Self {
        Self {
            rules: CombatRules::default(),
        }
    }

    pub fn with_rules(rules: CombatRules) -> Self {
        Self { rules }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime-tunable balance parameters.
///
/// All multipliers are plain factors (1.0 = no change). The defaults are the
/// canonical rule set; content packs may override any subset via TOML.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRules {
    /// Base critical chance as a fraction (1/16).
    pub crit_chance: f64,
    /// Damage factor applied on a critical hit.
    pub crit_multiplier: f64,
    /// Damage factor applied on a graze.
    pub graze_multiplier: f64,
    /// Lower bound of the variance roll.
    pub variance_min: f64,
    /// Upper bound of the variance roll.
    pub variance_max: f64,
    /// Damage factor when a move hits more than one target.
    pub multi_target_factor: f64,
    /// Attacker `Empowered`/`Focused` factor on matching non-critical hits.
    pub offense_buff_multiplier: f64,
    /// Defender `Fortified` divisor on non-critical hits.
    pub defense_buff_multiplier: f64,
    /// Factor applied to physical damage against a `Frozen` defender.
    pub frozen_vulnerability: f64,
    /// Accuracy factor while `Blinded`.
    pub blind_accuracy_multiplier: f64,
    /// Strength/intelligence factor while `Weakened`.
    pub weakened_multiplier: f64,
    /// Agility factor while `Slowed`.
    pub slowed_multiplier: f64,
    /// Divisor of max HP used by burn riders and burn ticks.
    pub burn_divisor: u32,
    /// Divisor of max HP used by the first poison tick.
    pub poison_divisor: u32,
    /// Maximum doubling exponent for escalating poison.
    pub poison_counter_cap: u8,
    /// Divisor of max HP restored by each `Regenerating` tick.
    pub regeneration_divisor: u32,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            crit_chance: 1.0 / 16.0,
            crit_multiplier: 1.5,
            graze_multiplier: 0.25,
            variance_min: 0.85,
            variance_max: 1.0,
            multi_target_factor: 0.75,
            offense_buff_multiplier: 1.5,
            defense_buff_multiplier: 1.5,
            frozen_vulnerability: 2.0,
            blind_accuracy_multiplier: 0.6,
            weakened_multiplier: 0.75,
            slowed_multiplier: 0.5,
            burn_divisor: 16,
            poison_divisor: 16,
            poison_counter_cap: 3,
            regeneration_divisor: 16,
        }
    }
}
