//! Stat stages: integer modifiers in `[-6, 6]` applied multiplicatively.

use super::core::Stat;

/// Lowest stage value.
pub const MIN_STAGE: i8 = -6;
/// Highest stage value.
pub const MAX_STAGE: i8 = 6;

/// Multipliers for stages -6..=6.
///
/// Positive stages follow `(2+n)/2`, negative stages `2/(2+|n|)`.
pub const STAGE_MULTIPLIERS: [f64; 13] = [
    2.0 / 8.0,
    2.0 / 7.0,
    2.0 / 6.0,
    2.0 / 5.0,
    2.0 / 4.0,
    2.0 / 3.0,
    1.0,
    3.0 / 2.0,
    4.0 / 2.0,
    5.0 / 2.0,
    6.0 / 2.0,
    7.0 / 2.0,
    8.0 / 2.0,
];

/// Multiplier for a stage. Out-of-range input is clamped first.
pub fn stage_multiplier(stage: i8) -> f64 {
    let clamped = stage.clamp(MIN_STAGE, MAX_STAGE);
    STAGE_MULTIPLIERS[(clamped - MIN_STAGE) as usize]
}

/// Per-stat stage values for one combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatStages {
    stages: [i8; 4],
}

impl StatStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> i8 {
        self.stages[stat.index()]
    }

    /// Shift a stage by `delta`, clamping into `[-6, 6]`.
    ///
    /// Returns the change actually applied (0 when already at the cap).
    pub fn shift(&mut self, stat: Stat, delta: i8) -> i8 {
        let current = self.stages[stat.index()];
        let next = (current as i16 + delta as i16).clamp(MIN_STAGE as i16, MAX_STAGE as i16) as i8;
        self.stages[stat.index()] = next;
        next - current
    }

    /// Returns true if shifting in the direction of `delta` would change nothing.
    pub fn is_capped(&self, stat: Stat, delta: i8) -> bool {
        let current = self.get(stat);
        (delta > 0 && current >= MAX_STAGE) || (delta < 0 && current <= MIN_STAGE)
    }

    pub fn multiplier(&self, stat: Stat) -> f64 {
        stage_multiplier(self.get(stat))
    }

    pub fn reset(&mut self) {
        self.stages = [0; 4];
    }
}
