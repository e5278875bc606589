//! Event payloads passed to ability observers.
//!
//! Each payload is created once per dispatch and dropped when the dispatch
//! finishes.

use crate::action::MoveDef;
use crate::combat::DamageResult;
use crate::state::{Combatant, CombatantId, StatusKind};
use crate::stats::{BonusStack, Stat};

/// "Did stat calc": observers push bonuses onto the owner's base value.
#[derive(Clone, Debug)]
pub struct StatCalcEvent {
    pub stat: Stat,
    pub base: i32,
    pub bonuses: BonusStack,
}

impl StatCalcEvent {
    pub fn new(stat: Stat, base: i32) -> Self {
        Self {
            stat,
            base,
            bonuses: BonusStack::new(),
        }
    }

    pub fn resolve(&self) -> i32 {
        self.bonuses.resolve(self.base)
    }
}

/// "Did damage calc": attacker then defender observers scale `damage`.
#[derive(Clone, Debug)]
pub struct DamageCalcEvent<'a> {
    pub attacker: &'a Combatant,
    pub defender: &'a Combatant,
    pub mv: &'a MoveDef,
    pub damage: f64,
}

/// "Check hit": queried once per hit attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CheckHitEvent {
    /// Multiplier on the base critical chance, starting at 1.0.
    pub crit_multiplier: f64,
    /// Summed percent increase to accuracy.
    pub accuracy_increase: i32,
}

impl Default for CheckHitEvent {
    fn default() -> Self {
        Self {
            crit_multiplier: 1.0,
            accuracy_increase: 0,
        }
    }
}

/// Action-modifier observers adjust the queued priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionEvent {
    pub priority: i8,
}

/// "Reaction after hit": immutable outcome of one hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionEvent {
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub result: DamageResult,
    /// The defender fell to this hit.
    pub defeated: bool,
}

/// "Status applied": observers may cancel; later observers see the flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    pub target: CombatantId,
    pub source: Option<CombatantId>,
    pub kind: StatusKind,
    pub duration: u8,
    pub cancelled: bool,
}

/// Turn and battle lifecycle moments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleEvent {
    BattleStart,
    EnterField,
    TurnStart,
    TurnEnd,
}
