//! Per-round action queue.

use crate::state::CombatantId;

/// Priority assigned to switching out, ahead of every ordinary move.
pub const SWITCH_PRIORITY: i8 = 6;

/// What a combatant does this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionChoice {
    /// Use the move at `move_index` in the actor's move list.
    ///
    /// `target` is only consulted for single-target moves; `None` lets the
    /// engine pick the default target.
    UseMove {
        move_index: usize,
        target: Option<CombatantId>,
    },
    /// Swap with a benched teammate.
    Switch { to: CombatantId },
    /// Do nothing.
    Stall,
}

/// An action waiting to be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedAction {
    pub actor: CombatantId,
    pub choice: ActionChoice,
    /// Priority after action-modifier abilities.
    pub priority: i8,
    /// Effective agility when the queue was built.
    pub agility: i32,
    /// Submission sequence number; preserved for equal priority and agility.
    pub sequence: u32,
}

/// Orders the queue by priority then agility, both descending.
///
/// The sort is stable, so equal entries keep submission order.
pub fn sort_queue(queue: &mut [QueuedAction]) {
    queue.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.agility.cmp(&a.agility))
    });
}
