/// Final output of the damage pipeline for one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageResult {
    pub damage: u32,
    pub critical: bool,
    pub graze: bool,
    /// Elemental effectiveness product (1.0 neutral, 0.0 immune).
    pub effectiveness: f64,
}

impl DamageResult {
    /// Result of a zero-power move.
    pub const fn none() -> Self {
        Self {
            damage: 0,
            critical: false,
            graze: false,
            effectiveness: 1.0,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.effectiveness == 0.0
    }

    pub fn is_resisted(&self) -> bool {
        self.effectiveness < 1.0
    }
}

impl Default for DamageResult {
    fn default() -> Self {
        Self::none()
    }
}
