//! Random decisions inside the damage pipeline.
//!
//! A [`Roller`] either draws from the battle RNG (live resolution) or answers
//! with fixed values (simulation for the AI). The pipeline never touches the
//! RNG directly, so both paths run the same code.

use crate::config::CombatRules;
use crate::env::BattleRng;

/// How simulation picks the variance factor.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum VarianceMode {
    /// Lower bound (0.85).
    Minimum,
    /// Midpoint (0.925).
    #[default]
    Median,
    /// Upper bound (1.0).
    Maximum,
    /// Drawn from the RNG, like live resolution.
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RollMode {
    Live,
    Simulated(VarianceMode),
}

/// Source of hit, critical and variance decisions.
pub struct Roller<'r> {
    rng: &'r mut dyn BattleRng,
    mode: RollMode,
}

impl<'r> Roller<'r> {
    pub fn live(rng: &'r mut dyn BattleRng) -> Self {
        Self {
            rng,
            mode: RollMode::Live,
        }
    }

    pub fn simulated(rng: &'r mut dyn BattleRng, variance: VarianceMode) -> Self {
        Self {
            rng,
            mode: RollMode::Simulated(variance),
        }
    }

    /// Fixed-value simulation draws nothing from the RNG.
    fn is_deterministic(&self) -> bool {
        matches!(self.mode, RollMode::Simulated(mode) if mode != VarianceMode::Random)
    }

    /// True when a d100 roll lands at or below `accuracy`.
    pub fn hits(&mut self, accuracy: u32) -> bool {
        if self.is_deterministic() {
            return true;
        }
        self.rng.roll_d100() <= accuracy
    }

    /// True on a critical hit with the given probability.
    pub fn critical(&mut self, chance: f64) -> bool {
        if self.is_deterministic() {
            return false;
        }
        self.rng.chance(chance)
    }

    /// Variance factor within the configured range.
    pub fn variance(&mut self, rules: &CombatRules) -> f64 {
        let (min, max) = (rules.variance_min, rules.variance_max);
        match self.mode {
            RollMode::Simulated(VarianceMode::Minimum) => min,
            RollMode::Simulated(VarianceMode::Median) => (min + max) / 2.0,
            RollMode::Simulated(VarianceMode::Maximum) => max,
            RollMode::Simulated(VarianceMode::Random) | RollMode::Live => {
                min + self.rng.next_f64() * (max - min)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn fixed_modes_never_draw() {
        let rules = CombatRules::default();
        let mut rng = ScriptedRng::new(vec![99]);
        let mut roller = Roller::simulated(&mut rng, VarianceMode::Median);
        assert!(roller.hits(1));
        assert!(!roller.critical(1.0));
        assert!((roller.variance(&rules) - 0.925).abs() < 1e-12);
    }

    #[test]
    fn live_variance_stays_in_range() {
        let rules = CombatRules::default();
        let mut rng = crate::env::PcgRng::seed_from_u64(3);
        let mut roller = Roller::live(&mut rng);
        for _ in 0..200 {
            let v = roller.variance(&rules);
            assert!((0.85..=1.0).contains(&v));
        }
    }

    #[test]
    fn variance_mode_parses() {
        assert_eq!("MAXIMUM".parse::<VarianceMode>().ok(), Some(VarianceMode::Maximum));
    }
}
