//! Battle start, turn start and turn end.

use tracing::{debug, info};

use crate::abilities::{Dispatcher, LifecycleEvent};
use crate::config::CombatRules;
use crate::env::BattleRng;
use crate::events::BattleEvent;
use crate::state::{BattleState, CombatTags, CombatantId, Side, StatusKind};

use super::phase::{BattleOutcome, BattlePhase};
use super::BattleEngine;

impl<R: BattleRng> BattleEngine<R> {
    pub(super) fn battle_start(&mut self, events: &mut Vec<BattleEvent>) {
        events.push(BattleEvent::BattleStarted);
        {
            let mut fx = Dispatcher::new(&mut self.state, &mut self.rng, events);
            for side in [Side::Player, Side::Enemy] {
                let fielded = fx.state().view().active(side).next().is_some();
                if !fielded {
                    fill_slot(&mut fx, side, 0, None);
                }
            }
            for id in active_ids(fx.state()) {
                fx.lifecycle(id, LifecycleEvent::BattleStart);
            }
        }
        self.finish_or(events, BattlePhase::StartOfTurn);
    }

    pub(super) fn start_of_turn(&mut self, events: &mut Vec<BattleEvent>) {
        let round = self.state.round;
        events.push(BattleEvent::TurnStarted { round });
        {
            let mut fx = Dispatcher::new(&mut self.state, &mut self.rng, events);
            let living: Vec<CombatantId> = fx
                .state()
                .combatants
                .iter()
                .filter(|c| c.is_alive())
                .map(|c| c.id)
                .collect();
            for id in living {
                let expired = match fx.state_mut().get_mut(id) {
                    Some(c) => c.statuses.tick(),
                    None => continue,
                };
                for kind in expired {
                    fx.emit(BattleEvent::StatusRemoved { target: id, kind });
                }
            }
            for id in active_ids(fx.state()) {
                fx.lifecycle(id, LifecycleEvent::TurnStart);
            }
        }
        self.submissions.clear();
        self.set_phase(BattlePhase::ActionSelection);
    }

    pub(super) fn end_of_turn(&mut self, events: &mut Vec<BattleEvent>) {
        let round = self.state.round;
        let rules = self.config.rules;
        {
            let mut fx = Dispatcher::new(&mut self.state, &mut self.rng, events);
            let active = active_ids(fx.state());
            for &id in &active {
                fx.lifecycle(id, LifecycleEvent::TurnEnd);
            }
            for &id in &active {
                status_ticks(&mut fx, &rules, id);
            }
            for c in fx.state_mut().combatants.iter_mut() {
                c.tags.remove(CombatTags::PER_TURN);
            }
            fx.emit(BattleEvent::TurnEnded { round });
            replace_defeated(&mut fx);
        }

        if self.finish_or(events, BattlePhase::StartOfTurn) {
            return;
        }
        self.state.round += 1;
    }

    /// Ends the battle if one side is out, else moves to `next`.
    ///
    /// Returns true if the battle ended.
    pub(super) fn finish_or(&mut self, events: &mut Vec<BattleEvent>, next: BattlePhase) -> bool {
        match outcome(&self.state) {
            Some(outcome) => {
                info!(%outcome, round = self.state.round, "battle over");
                self.queue.clear();
                events.push(BattleEvent::BattleOver { outcome });
                self.set_phase(BattlePhase::BattleOver(outcome));
                true
            }
            None => {
                self.set_phase(next);
                false
            }
        }
    }
}

/// Victory when only the player side has living combatants, defeat when only
/// the enemy side does, draw when neither does.
pub(super) fn outcome(state: &BattleState) -> Option<BattleOutcome> {
    match (
        state.side_has_living(Side::Player),
        state.side_has_living(Side::Enemy),
    ) {
        (true, true) => None,
        (true, false) => Some(BattleOutcome::Victory),
        (false, true) => Some(BattleOutcome::Defeat),
        (false, false) => Some(BattleOutcome::Draw),
    }
}

/// Living on-field combatants in roster order.
pub(super) fn active_ids(state: &BattleState) -> Vec<CombatantId> {
    state
        .combatants
        .iter()
        .filter(|c| c.is_active())
        .map(|c| c.id)
        .collect()
}

/// Moves the first living reserve of `side` into `slot`.
fn fill_slot(
    fx: &mut Dispatcher<'_>,
    side: Side,
    slot: u8,
    outgoing: Option<CombatantId>,
) -> Option<CombatantId> {
    let incoming = fx.state().first_reserve(side)?;
    if let Some(out) = outgoing {
        if let Some(c) = fx.state_mut().get_mut(out) {
            c.slot = None;
        }
    }
    if let Some(c) = fx.state_mut().get_mut(incoming) {
        c.slot = Some(slot);
    }
    debug!(incoming = %incoming, ?outgoing, slot, "combatant enters the field");
    fx.emit(BattleEvent::SwitchedIn {
        incoming,
        outgoing,
        slot,
    });
    Some(incoming)
}

/// Replaces every defeated on-field combatant with the first living reserve
/// of its side. Entering combatants fire their on-enter hooks.
pub(super) fn replace_defeated(fx: &mut Dispatcher<'_>) {
    let fallen: Vec<(CombatantId, Side, u8)> = fx
        .state()
        .combatants
        .iter()
        .filter(|c| !c.is_alive())
        .filter_map(|c| c.slot.map(|slot| (c.id, c.side, slot)))
        .collect();

    for (id, side, slot) in fallen {
        if let Some(incoming) = fill_slot(fx, side, slot, Some(id)) {
            fx.lifecycle(incoming, LifecycleEvent::EnterField);
        }
    }
}

/// End-of-turn status damage and healing for one combatant.
fn status_ticks(fx: &mut Dispatcher<'_>, rules: &CombatRules, id: CombatantId) {
    let Some(c) = fx.state().get(id) else {
        return;
    };
    if !c.is_alive() {
        return;
    }
    let max_hp = c.stats.max_hp();
    let burned = c.statuses.has(StatusKind::Burned);
    let poison_counter = c.statuses.get(StatusKind::Poisoned).map(|e| e.counter);
    let regenerating = c.statuses.has(StatusKind::Regenerating);

    if burned {
        let amount = (max_hp / rules.burn_divisor.max(1)).max(1);
        fx.emit(BattleEvent::StatusTriggered {
            target: id,
            kind: StatusKind::Burned,
            amount,
        });
        fx.inflict(id, amount);
    }

    if let Some(counter) = poison_counter {
        let exponent = counter.min(rules.poison_counter_cap).min(16);
        let base = (max_hp / rules.poison_divisor.max(1)).max(1);
        let amount = base.saturating_mul(1u32 << exponent);
        if let Some(effect) = fx
            .state_mut()
            .get_mut(id)
            .and_then(|c| c.statuses.get_mut(StatusKind::Poisoned))
        {
            effect.counter = (exponent + 1).min(rules.poison_counter_cap);
        }
        let alive = fx.state().get(id).is_some_and(|c| c.is_alive());
        if alive {
            fx.emit(BattleEvent::StatusTriggered {
                target: id,
                kind: StatusKind::Poisoned,
                amount,
            });
            fx.inflict(id, amount);
        }
    }

    if regenerating {
        let amount = (max_hp / rules.regeneration_divisor.max(1)).max(1);
        let alive = fx.state().get(id).is_some_and(|c| c.is_alive());
        if alive {
            fx.emit(BattleEvent::StatusTriggered {
                target: id,
                kind: StatusKind::Regenerating,
                amount,
            });
            fx.heal(id, amount);
        }
    }
}
