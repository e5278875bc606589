//! Ability definitions, per-combatant ability state, and the trigger system.
//!
//! An ability is a closed [`AbilityKind`] with typed parameters. Observers are
//! invoked by the functions in [`dispatch`] for each event type; hooks that
//! change the battle return [`Reaction`] commands, which the [`Dispatcher`]
//! applies immediately and in order.

pub mod dispatch;
pub mod events;
mod reaction;

use std::sync::Arc;

use crate::action::Impact;
use crate::env::{ElementId, normalize_key};
use crate::state::StatusKind;
use crate::stats::Stat;

pub use events::{
    ActionEvent, CheckHitEvent, DamageCalcEvent, LifecycleEvent, ReactionEvent, StatCalcEvent,
    StatusEvent,
};
pub use reaction::{Dispatcher, Reaction};

/// Closed set of ability behaviours.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityKind {
    /// Flat bonus to one or more attributes.
    StatModifier { modifiers: Vec<(Stat, i32)> },
    /// Percent bonus to `stat` at low HP or when outnumbered.
    Cornered {
        stat: Stat,
        hp_threshold_pct: u8,
        enemy_count_threshold: u8,
        bonus_pct: i32,
    },
    /// Outgoing damage bonus while at or below `threshold_pct` HP.
    LowHpDamageBonus { threshold_pct: u8, bonus_pct: i32 },
    /// Incoming damage reduction, optionally limited to one impact type.
    DamageReduction { percent: u8, impact: Option<Impact> },
    /// Outgoing damage bonus for moves of `element`.
    ElementalBoost { element: ElementId, bonus_pct: i32 },
    /// Adds to the critical chance multiplier.
    KeenEye { multiplier_pct: u32 },
    /// Percent increase to accuracy.
    Precision { bonus_pct: i32 },
    /// Priority bonus while at or below `max_hp_pct` HP.
    QuickStrike { priority: i8, max_hp_pct: u8 },
    /// Heals the attacker for a share of damage dealt.
    Lifesteal { percent: u8 },
    /// Reflects a share of damage taken to the attacker.
    Thorns { percent: u8 },
    /// Stage change after defeating a target.
    Bloodlust { stat: Stat, stages: i8 },
    /// Stage change after receiving a critical hit.
    AngerPoint { stat: Stat, stages: i8 },
    /// Chance to inflict `status` on hit.
    Venomous {
        status: StatusKind,
        chance_pct: u8,
        duration: u8,
    },
    /// Cancels the listed statuses.
    StatusImmunity { statuses: Vec<StatusKind> },
    /// Heals the owner after it inflicts a negative status.
    Sadism { heal_pct: u8 },
    /// Heals a share of max HP at end of turn.
    Regeneration { percent: u8 },
    /// Gains a stack each turn end; each stack boosts outgoing damage.
    Escalation {
        bonus_pct_per_stack: i32,
        max_stacks: u8,
    },
    /// Changes a stage of every active enemy on battle start and field entry.
    Intimidate { stat: Stat, stages: i8 },
    /// Once per turn, shakes off `DAZED` before acting.
    Vigilance,
}

/// Immutable, shared ability definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDef {
    /// Normalized catalog key.
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,
}

impl AbilityDef {
    pub fn new(id: &str, kind: AbilityKind) -> Self {
        Self {
            id: normalize_key(id),
            name: id.to_string(),
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Mutable per-combatant ability state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityState {
    /// Accumulated stacks (Escalation).
    pub stacks: u8,
    /// One-shot flag re-armed every turn (Vigilance).
    pub charged: bool,
}

/// An ability attached to one combatant.
#[derive(Clone, Debug)]
pub struct AbilityInstance {
    pub def: Arc<AbilityDef>,
    pub state: AbilityState,
}

impl AbilityInstance {
    pub fn new(def: Arc<AbilityDef>) -> Self {
        Self {
            def,
            state: AbilityState::default(),
        }
    }

    pub fn kind(&self) -> &AbilityKind {
        &self.def.kind
    }
}
