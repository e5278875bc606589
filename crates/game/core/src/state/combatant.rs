use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::abilities::{AbilityDef, AbilityInstance};
use crate::action::MoveDef;
use crate::env::ElementId;
use crate::stats::{CombatantStats, StatStages};

use super::status::{StatusEffects, StatusKind};

/// Unique identifier for a combatant within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u16);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which team a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

bitflags! {
    /// Short-lived gameplay tags, cleared at the end of every turn.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatTags: u8 {
        /// Loses the next action this turn.
        const DAZED     = 1 << 0;
        /// Damage from other combatants is blocked.
        const PROTECTED = 1 << 1;
    }
}

impl CombatTags {
    /// Tags that only last until the end of the current turn.
    pub const PER_TURN: CombatTags = CombatTags::DAZED.union(CombatTags::PROTECTED);
}

/// A participant in the battle.
///
/// Moves and ability definitions are shared read-only through `Arc`; ability
/// state, stages, statuses and tags belong to this instance alone.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub player_controlled: bool,
    /// Field slot, or `None` while benched.
    pub slot: Option<u8>,
    pub stats: CombatantStats,
    pub statuses: StatusEffects,
    pub stages: StatStages,
    pub tags: CombatTags,
    pub elements: Vec<ElementId>,
    pub moves: Vec<Arc<MoveDef>>,
    pub abilities: Vec<AbilityInstance>,
}

impl Combatant {
    pub fn new(id: CombatantId, name: impl Into<String>, side: Side) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            player_controlled: false,
            slot: None,
            stats: CombatantStats::default(),
            statuses: StatusEffects::new(),
            stages: StatStages::new(),
            tags: CombatTags::empty(),
            elements: Vec::new(),
            moves: Vec::new(),
            abilities: Vec::new(),
        }
    }

    pub fn player_controlled(mut self) -> Self {
        self.player_controlled = true;
        self
    }

    pub fn at_slot(mut self, slot: u8) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn with_stats(mut self, stats: CombatantStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_element(mut self, element: impl Into<ElementId>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn with_move(mut self, mv: Arc<MoveDef>) -> Self {
        self.moves.push(mv);
        self
    }

    pub fn with_ability(mut self, def: Arc<AbilityDef>) -> Self {
        self.abilities.push(AbilityInstance::new(def));
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_on_field(&self) -> bool {
        self.slot.is_some()
    }

    /// Alive and occupying a field slot.
    pub fn is_active(&self) -> bool {
        self.is_alive() && self.is_on_field()
    }

    /// Stunned or dazed combatants lose their action.
    pub fn is_incapacitated(&self) -> bool {
        self.statuses.has(StatusKind::Stunned) || self.tags.contains(CombatTags::DAZED)
    }

    pub fn is_ally_of(&self, other: &Combatant) -> bool {
        self.side == other.side
    }
}

/// Serializable snapshot of a combatant, with definitions reduced to ids.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantRecord {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub player_controlled: bool,
    pub slot: Option<u8>,
    pub stats: CombatantStats,
    pub statuses: StatusEffects,
    pub stages: StatStages,
    pub tags: CombatTags,
    pub moves: Vec<String>,
    pub abilities: Vec<(String, crate::abilities::AbilityState)>,
}

impl From<&Combatant> for CombatantRecord {
    fn from(c: &Combatant) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            side: c.side,
            player_controlled: c.player_controlled,
            slot: c.slot,
            stats: c.stats.clone(),
            statuses: c.statuses.clone(),
            stages: c.stages,
            tags: c.tags,
            moves: c.moves.iter().map(|m| m.id.clone()).collect(),
            abilities: c
                .abilities
                .iter()
                .map(|a| (a.def.id.clone(), a.state))
                .collect(),
        }
    }
}
