//! Asynchronous abstraction for sourcing player intent.
//!
//! Hosts plug in [`ActionProvider`] implementations so a session can run with
//! human input, scripted fixtures, or AI policies.
use std::collections::VecDeque;

use async_trait::async_trait;
use combat_core::action::ActionChoice;
use combat_core::state::{BattleState, CombatantId};

use super::errors::{Result, RuntimeError};

/// Everything a provider needs to pick an action for one player slot.
#[derive(Clone, Debug)]
pub struct ActionRequest {
    pub slot: u8,
    pub actor: CombatantId,
    pub round: u32,
    /// Snapshot of the battle at the time of the request.
    pub state: BattleState,
}

/// Trait for providing actions for player-controlled combatants.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - AI decisions on the player's behalf
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send {
    /// Provide an action for the combatant described by `request`.
    ///
    /// An error leaves the slot without input; the session's stall watchdog
    /// eventually fills it with a stall.
    async fn provide_action(&mut self, request: &ActionRequest) -> Result<ActionChoice>;
}

/// A provider that always stalls.
pub struct StallActionProvider;

#[async_trait]
impl ActionProvider for StallActionProvider {
    async fn provide_action(&mut self, _request: &ActionRequest) -> Result<ActionChoice> {
        Ok(ActionChoice::Stall)
    }
}

/// Replays a fixed list of actions in order, across all slots.
#[derive(Debug, Default)]
pub struct ScriptedActionProvider {
    actions: VecDeque<ActionChoice>,
}

impl ScriptedActionProvider {
    pub fn new(actions: impl IntoIterator<Item = ActionChoice>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    async fn provide_action(&mut self, request: &ActionRequest) -> Result<ActionChoice> {
        self.actions
            .pop_front()
            .ok_or(RuntimeError::ProviderExhausted { slot: request.slot })
    }
}
