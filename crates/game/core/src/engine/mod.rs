//! Battle scheduler.
//!
//! The [`BattleEngine`] is the authoritative owner of [`BattleState`]. Hosts
//! drive it with [`BattleEngine::advance`] once per tick; each call runs one
//! phase step to completion and returns the notifications it produced.
//! Player input arrives through [`BattleEngine::submit_player_action`].

mod errors;
mod lifecycle;
mod phase;
mod resolve;

pub use errors::{SetupError, SubmitError};
pub use phase::{BattleOutcome, BattlePhase};

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tracing::{info, warn};

use crate::action::{ActionChoice, QueuedAction};
use crate::ai::AiConfig;
use crate::combat::DamageContext;
use crate::config::BattleConfig;
use crate::env::{BattleRng, ElementMatrix, PcgRng};
use crate::events::BattleEvent;
use crate::state::{BattleState, Combatant, CombatantId, Side};

/// A player action waiting for the queue to be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Submission {
    slot: u8,
    actor: CombatantId,
    choice: ActionChoice,
}

/// Deterministic turn-based battle engine.
///
/// Same combatants, same seed and same submitted actions always produce the
/// same events and the same [`BattleState::digest`].
pub struct BattleEngine<R: BattleRng = PcgRng> {
    state: BattleState,
    elements: Arc<ElementMatrix>,
    config: BattleConfig,
    ai: AiConfig,
    rng: R,
    phase: BattlePhase,
    submissions: Vec<Submission>,
    queue: VecDeque<QueuedAction>,
}

impl<R: BattleRng> BattleEngine<R> {
    /// Validates the roster and creates an engine in [`BattlePhase::BattleStart`].
    pub fn new(
        combatants: Vec<Combatant>,
        elements: Arc<ElementMatrix>,
        config: BattleConfig,
        rng: R,
    ) -> Result<Self, SetupError> {
        validate_roster(&combatants)?;
        info!(combatants = combatants.len(), "battle created");
        Ok(Self {
            state: BattleState::new(combatants),
            elements,
            config,
            ai: AiConfig::default(),
            rng,
            phase: BattlePhase::BattleStart,
            submissions: Vec::new(),
            queue: VecDeque::new(),
        })
    }

    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.phase {
            BattlePhase::BattleOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    /// Direct state access for scripted scenarios and tools.
    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    pub fn round(&self) -> u32 {
        self.state.round
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai
    }

    pub fn elements(&self) -> &ElementMatrix {
        &self.elements
    }

    /// Read-only inputs for simulating damage against the current state.
    pub fn damage_context(&self) -> DamageContext<'_> {
        DamageContext {
            view: self.state.view(),
            elements: &self.elements,
            rules: &self.config.rules,
        }
    }

    /// Remaining actions of the current round, in resolution order.
    pub fn queue(&self) -> impl Iterator<Item = &QueuedAction> {
        self.queue.iter()
    }

    /// SHA-256 of the current battle state; see [`BattleState::digest`].
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], crate::state::DigestError> {
        self.state.digest()
    }

    /// Player slots that still need an action this round.
    pub fn awaiting_input(&self) -> Vec<u8> {
        if self.phase != BattlePhase::ActionSelection {
            return Vec::new();
        }
        let submitted: HashSet<CombatantId> = self.submissions.iter().map(|s| s.actor).collect();
        let mut slots: Vec<u8> = self
            .state
            .combatants
            .iter()
            .filter(|c| is_manual(c) && c.is_active() && !submitted.contains(&c.id))
            .filter_map(|c| c.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    /// Records the action for the player combatant in `slot`.
    ///
    /// Invalid input leaves the battle untouched and is reported back.
    pub fn submit_player_action(&mut self, slot: u8, choice: ActionChoice) -> Result<(), SubmitError> {
        let result = self.validate_submission(slot, choice);
        match result {
            Ok(actor) => {
                self.submissions.push(Submission {
                    slot,
                    actor,
                    choice,
                });
                Ok(())
            }
            Err(err) => {
                warn!(slot, error = %err, "player action ignored");
                Err(err)
            }
        }
    }

    fn validate_submission(&self, slot: u8, choice: ActionChoice) -> Result<CombatantId, SubmitError> {
        if self.phase != BattlePhase::ActionSelection {
            return Err(SubmitError::NotSelecting { phase: self.phase });
        }
        let actor = self
            .state
            .at_slot(Side::Player, slot)
            .ok_or(SubmitError::EmptySlot { slot })?;
        let id = actor.id;
        if !actor.is_alive() {
            return Err(SubmitError::Defeated { id });
        }
        if !actor.player_controlled {
            return Err(SubmitError::NotPlayerControlled { id });
        }
        if self.submissions.iter().any(|s| s.actor == id) {
            return Err(SubmitError::AlreadySubmitted { id });
        }
        match choice {
            ActionChoice::UseMove { move_index, .. } if move_index >= actor.moves.len() => {
                Err(SubmitError::UnknownMove {
                    id,
                    index: move_index,
                })
            }
            ActionChoice::Switch { to } => {
                let valid = self
                    .state
                    .get(to)
                    .is_some_and(|c| c.side == actor.side && c.is_alive() && !c.is_on_field());
                if valid {
                    Ok(id)
                } else {
                    Err(SubmitError::InvalidSwitch { id, to })
                }
            }
            _ => Ok(id),
        }
    }

    /// Runs one phase step and returns its notifications.
    ///
    /// During [`BattlePhase::ActionSelection`] this is a no-op until every
    /// active player combatant has an action.
    pub fn advance(&mut self) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        match self.phase {
            BattlePhase::BattleStart => self.battle_start(&mut events),
            BattlePhase::StartOfTurn => self.start_of_turn(&mut events),
            BattlePhase::ActionSelection => self.select_actions(),
            BattlePhase::ActionResolution => self.resolve_next(&mut events),
            BattlePhase::EndOfTurn => self.end_of_turn(&mut events),
            BattlePhase::BattleOver(_) => {}
        }
        events
    }

    /// Like [`Self::advance`], but missing player actions become `Stall`.
    pub fn force_advance(&mut self) -> Vec<BattleEvent> {
        if self.phase == BattlePhase::ActionSelection {
            for slot in self.awaiting_input() {
                if let Some(actor) = self.state.at_slot(Side::Player, slot).map(|c| c.id) {
                    warn!(slot, actor = %actor, "no input received; stalling");
                    self.submissions.push(Submission {
                        slot,
                        actor,
                        choice: ActionChoice::Stall,
                    });
                }
            }
        }
        self.advance()
    }

    fn set_phase(&mut self, next: BattlePhase) {
        if self.phase != next {
            info!(from = %self.phase, to = %next, round = self.state.round, "phase transition");
        }
        self.phase = next;
    }
}

/// Player-side combatants that wait for submitted input.
fn is_manual(c: &Combatant) -> bool {
    c.player_controlled && c.side == Side::Player
}

fn validate_roster(combatants: &[Combatant]) -> Result<(), SetupError> {
    if combatants.len() > BattleConfig::MAX_COMBATANTS {
        return Err(SetupError::TooManyCombatants {
            count: combatants.len(),
            max: BattleConfig::MAX_COMBATANTS,
        });
    }

    let mut ids = HashSet::new();
    let mut slots = HashSet::new();
    for c in combatants {
        if !ids.insert(c.id) {
            return Err(SetupError::DuplicateCombatant { id: c.id });
        }
        if let Some(slot) = c.slot {
            if slot >= BattleConfig::FIELD_SLOTS {
                return Err(SetupError::SlotOutOfRange {
                    id: c.id,
                    slot,
                    max: BattleConfig::FIELD_SLOTS,
                });
            }
            if !slots.insert((c.side, slot)) {
                return Err(SetupError::SlotOccupied { side: c.side, slot });
            }
        }
    }

    for side in [Side::Player, Side::Enemy] {
        if !combatants.iter().any(|c| c.side == side) {
            return Err(SetupError::EmptyRoster { side });
        }
    }

    if !combatants.iter().any(|c| is_manual(c) && c.is_alive()) {
        return Err(SetupError::NoLivingPlayer);
    }

    Ok(())
}
