//! Immutable move definitions.
//!
//! Definitions are produced once by a content loader and shared by `Arc`.

use std::sync::Arc;

use bitflags::bitflags;

use crate::abilities::AbilityDef;
use crate::env::{ElementId, normalize_key};
use crate::state::StatusKind;
use crate::stats::Stat;

/// Chance to connect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accuracy {
    /// Never grazes, ignores evasion.
    TrueHit,
    /// Hits when a d100 roll is at or below the value.
    Percent(u8),
}

/// How a move deals damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Impact {
    Physical,
    Magical,
    Support,
}

/// Who a move may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TargetKind {
    SingleEnemy,
    AllEnemies,
    /// Any on-field teammate, the user included.
    SingleAlly,
    AllAllies,
    User,
    /// Any on-field combatant except the user.
    AnyOther,
}

impl TargetKind {
    /// True when the player or AI picks one target.
    pub const fn is_single(self) -> bool {
        matches!(
            self,
            TargetKind::SingleEnemy | TargetKind::SingleAlly | TargetKind::AnyOther
        )
    }
}

bitflags! {
    /// Behavioural flags attached to a move.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MoveTags: u8 {
        /// The user faints after the move resolves.
        const SELF_DESTRUCT = 1 << 0;
        /// Ignores `PROTECTED`.
        const PIERCING      = 1 << 1;
    }
}

/// Recipient of a secondary effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EffectTarget {
    /// Each target of the move.
    Target,
    /// The user, once per move.
    User,
}

/// Secondary effect applied after damage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveEffect {
    ApplyStatus {
        status: StatusKind,
        duration: u8,
        chance_pct: u8,
        target: EffectTarget,
    },
    StatStage {
        stat: Stat,
        stages: i8,
        chance_pct: u8,
        target: EffectTarget,
    },
    /// Restore a percentage of the recipient's max HP.
    Heal { percent: u8, target: EffectTarget },
    /// The user loses a percentage of the damage it dealt.
    Recoil { percent: u8 },
    /// Remove every negative status.
    Cleanse { target: EffectTarget },
    /// The user blocks damage until the end of the turn.
    Protect,
    /// The target loses its next action this turn.
    Daze { chance_pct: u8 },
}

impl MoveEffect {
    pub fn recipient(&self) -> EffectTarget {
        match self {
            MoveEffect::ApplyStatus { target, .. }
            | MoveEffect::StatStage { target, .. }
            | MoveEffect::Heal { target, .. }
            | MoveEffect::Cleanse { target } => *target,
            MoveEffect::Recoil { .. } | MoveEffect::Protect => EffectTarget::User,
            MoveEffect::Daze { .. } => EffectTarget::Target,
        }
    }
}

/// Scoring hint for the AI evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AiHint {
    /// Favoured as the user's HP drops.
    SelfDestruct,
    /// Favoured in the first round only.
    Opener,
    /// Favoured against targets at low HP.
    Finisher,
}

/// A move a combatant can use.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveDef {
    /// Normalized catalog key.
    pub id: String,
    pub name: String,
    pub power: u32,
    pub accuracy: Accuracy,
    pub priority: i8,
    /// Attribute used as offense in the damage formula.
    pub offense: Stat,
    pub impact: Impact,
    pub target: TargetKind,
    pub elements: Vec<ElementId>,
    pub tags: MoveTags,
    pub mana_cost: u32,
    pub effects: Vec<MoveEffect>,
    /// Abilities active only while this move resolves.
    pub abilities: Vec<Arc<AbilityDef>>,
    pub ai_hint: Option<AiHint>,
}

impl MoveDef {
    /// A zero-power, true-hit, single-enemy physical move.
    pub fn new(id: &str, name: impl Into<String>) -> Self {
        Self {
            id: normalize_key(id),
            name: name.into(),
            power: 0,
            accuracy: Accuracy::TrueHit,
            priority: 0,
            offense: Stat::Strength,
            impact: Impact::Physical,
            target: TargetKind::SingleEnemy,
            elements: Vec::new(),
            tags: MoveTags::empty(),
            mana_cost: 0,
            effects: Vec::new(),
            abilities: Vec::new(),
            ai_hint: None,
        }
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the impact and picks the matching offensive attribute.
    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self.offense = match impact {
            Impact::Magical => Stat::Intelligence,
            _ => Stat::Strength,
        };
        self
    }

    pub fn with_target(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    pub fn with_element(mut self, element: impl Into<ElementId>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn with_tags(mut self, tags: MoveTags) -> Self {
        self.tags |= tags;
        self
    }

    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }

    pub fn with_effect(mut self, effect: MoveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_ability(mut self, ability: Arc<AbilityDef>) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_hint(mut self, hint: AiHint) -> Self {
        self.ai_hint = Some(hint);
        self
    }

    pub fn is_damaging(&self) -> bool {
        self.power > 0
    }

    pub fn is_physical(&self) -> bool {
        self.impact == Impact::Physical
    }
}
