//! Notifications emitted by the engine.
//!
//! Events are fire-and-forget: the engine never waits on a listener, and the
//! battle outcome does not depend on whether anyone observes them.

use crate::action::ActionChoice;
use crate::combat::DamageResult;
use crate::engine::BattleOutcome;
use crate::state::{CombatantId, StatusKind};
use crate::stats::Stat;

/// Why a move did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FailReason {
    NotEnoughMana,
    Silenced,
    NoTarget,
}

/// Why an actor lost its action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    Stunned,
    Dazed,
}

/// Outcome of a move against one target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetResult {
    pub target: CombatantId,
    pub result: DamageResult,
    /// Damage was stopped by `PROTECTED`.
    pub blocked: bool,
}

/// A battle notification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    BattleStarted,
    TurnStarted {
        round: u32,
    },
    TurnEnded {
        round: u32,
    },
    ActionDeclared {
        actor: CombatantId,
        choice: ActionChoice,
    },
    ActionExecuted {
        actor: CombatantId,
        move_id: String,
        results: Vec<TargetResult>,
    },
    Healed {
        target: CombatantId,
        amount: u32,
    },
    /// Damage from a source other than a move hit.
    Damaged {
        target: CombatantId,
        amount: u32,
    },
    Recoiled {
        actor: CombatantId,
        amount: u32,
    },
    Defeated {
        target: CombatantId,
    },
    /// `outgoing` is `None` when the slot was empty.
    SwitchedIn {
        incoming: CombatantId,
        outgoing: Option<CombatantId>,
        slot: u8,
    },
    StatusApplied {
        target: CombatantId,
        kind: StatusKind,
        duration: u8,
    },
    StatusBlocked {
        target: CombatantId,
        kind: StatusKind,
    },
    StatusRemoved {
        target: CombatantId,
        kind: StatusKind,
    },
    /// A status dealt or restored HP at end of turn.
    StatusTriggered {
        target: CombatantId,
        kind: StatusKind,
        amount: u32,
    },
    StatStageChanged {
        target: CombatantId,
        stat: Stat,
        delta: i8,
        stage: i8,
    },
    AbilityActivated {
        owner: CombatantId,
        ability: String,
    },
    MoveFailed {
        actor: CombatantId,
        reason: FailReason,
    },
    ActionSkipped {
        actor: CombatantId,
        reason: SkipReason,
    },
    BattleOver {
        outcome: BattleOutcome,
    },
}
