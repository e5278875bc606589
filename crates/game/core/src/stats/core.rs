//! Base attributes and resource pools.
//!
//! [`CombatantStats`] is the single stored source of truth for a combatant's
//! numbers. Effective values are never stored; see [`super::effective`].

/// The four offensive/defensive attributes.
///
/// - **Strength**: physical offense
/// - **Intelligence**: magical offense
/// - **Tenacity**: defense against both
/// - **Agility**: turn order
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stat {
    Strength,
    Intelligence,
    Tenacity,
    Agility,
}

impl Stat {
    pub const ALL: [Stat; 4] = [
        Stat::Strength,
        Stat::Intelligence,
        Stat::Tenacity,
        Stat::Agility,
    ];

    pub const fn index(self) -> usize {
        match self {
            Stat::Strength => 0,
            Stat::Intelligence => 1,
            Stat::Tenacity => 2,
            Stat::Agility => 3,
        }
    }
}

/// Level, resource pools and base attributes of a combatant.
///
/// Invariants: `current_hp <= max_hp`, `current_mana <= max_mana`. Resources
/// only change through the methods below, which enforce them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantStats {
    pub level: u32,
    max_hp: u32,
    current_hp: u32,
    max_mana: u32,
    current_mana: u32,
    pub strength: i32,
    pub intelligence: i32,
    pub tenacity: i32,
    pub agility: i32,
}

impl CombatantStats {
    /// Create stats at full HP and mana.
    pub fn new(level: u32, max_hp: u32, max_mana: u32) -> Self {
        Self {
            level,
            max_hp,
            current_hp: max_hp,
            max_mana,
            current_mana: max_mana,
            strength: 10,
            intelligence: 10,
            tenacity: 10,
            agility: 10,
        }
    }

    /// Builder: set all four attributes.
    pub fn with_attributes(
        mut self,
        strength: i32,
        intelligence: i32,
        tenacity: i32,
        agility: i32,
    ) -> Self {
        self.strength = strength;
        self.intelligence = intelligence;
        self.tenacity = tenacity;
        self.agility = agility;
        self
    }

    /// Builder: start at a specific HP (clamped to max).
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.current_hp = hp.min(self.max_hp);
        self
    }

    /// Builder: start at a specific mana (clamped to max).
    pub fn with_current_mana(mut self, mana: u32) -> Self {
        self.current_mana = mana.min(self.max_mana);
        self
    }

    pub fn base(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Intelligence => self.intelligence,
            Stat::Tenacity => self.tenacity,
            Stat::Agility => self.agility,
        }
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn current_mana(&self) -> u32 {
        self.current_mana
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Current HP as a percentage of max (0-100). Zero max HP reads as 0.
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp == 0 {
            return 0;
        }
        (self.current_hp as u64 * 100 / self.max_hp as u64) as u32
    }

    /// Remove HP, clamped at 0. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP, clamped at max. Returns the HP actually restored.
    pub fn apply_healing(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.current_hp);
        self.current_hp += restored;
        restored
    }

    /// Set HP directly (clamped to max). Intended for scripted setups and tools.
    pub fn set_current_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn has_mana(&self, cost: u32) -> bool {
        self.current_mana >= cost
    }

    /// Spend mana if affordable. Returns false without spending otherwise.
    pub fn spend_mana(&mut self, cost: u32) -> bool {
        if !self.has_mana(cost) {
            return false;
        }
        self.current_mana -= cost;
        true
    }

    /// Restore mana, clamped at max. Returns the mana actually restored.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mana - self.current_mana);
        self.current_mana += restored;
        restored
    }
}

impl Default for CombatantStats {
    /// Level 1, 100 HP, 20 mana, all attributes 10.
    fn default() -> Self {
        Self::new(1, 100, 20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_clamps_at_zero() {
        let mut stats = CombatantStats::new(5, 30, 0);
        assert_eq!(stats.apply_damage(50), 30);
        assert_eq!(stats.current_hp(), 0);
        assert!(!stats.is_alive());
    }

    #[test]
    fn healing_clamps_at_max() {
        let mut stats = CombatantStats::new(5, 30, 0).with_current_hp(25);
        assert_eq!(stats.apply_healing(50), 5);
        assert_eq!(stats.current_hp(), 30);
    }

    #[test]
    fn spend_mana_requires_enough() {
        let mut stats = CombatantStats::new(1, 10, 5);
        assert!(!stats.spend_mana(6));
        assert_eq!(stats.current_mana(), 5);
        assert!(stats.spend_mana(5));
        assert_eq!(stats.current_mana(), 0);
    }

    #[test]
    fn stat_parses_case_insensitively() {
        assert_eq!("STRENGTH".parse::<Stat>().ok(), Some(Stat::Strength));
        assert_eq!("agility".parse::<Stat>().ok(), Some(Stat::Agility));
        assert!("luck".parse::<Stat>().is_err());
    }

    #[test]
    fn hp_percent_rounds_down() {
        let stats = CombatantStats::new(1, 3, 0).with_current_hp(1);
        assert_eq!(stats.hp_percent(), 33);
    }
}
