use std::sync::Arc;

use tracing::debug;

use crate::action::MoveDef;
use crate::env::BattleRng;
use crate::events::BattleEvent;
use crate::state::{ApplyOutcome, BattleState, CombatTags, CombatantId, StatusKind};
use crate::stats::Stat;

use super::dispatch;
use super::events::{LifecycleEvent, ReactionEvent, StatusEvent};
use super::AbilityDef;

/// A state change requested by an ability hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Heal {
        target: CombatantId,
        amount: u32,
    },
    Damage {
        target: CombatantId,
        amount: u32,
    },
    StageChange {
        target: CombatantId,
        stat: Stat,
        delta: i8,
    },
    ApplyStatus {
        target: CombatantId,
        source: Option<CombatantId>,
        kind: StatusKind,
        duration: u8,
        chance_pct: u8,
    },
}

/// Applies battle mutations and records a notification for each one.
///
/// Every HP, stage, status and tag change made during resolution goes through
/// this type, so hooks and the scheduler share one path.
pub struct Dispatcher<'a> {
    state: &'a mut BattleState,
    rng: &'a mut dyn BattleRng,
    events: &'a mut Vec<BattleEvent>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        state: &'a mut BattleState,
        rng: &'a mut dyn BattleRng,
        events: &'a mut Vec<BattleEvent>,
    ) -> Self {
        Self { state, rng, events }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        self.state
    }

    pub fn rng(&mut self) -> &mut dyn BattleRng {
        &mut *self.rng
    }

    /// Read access to the state alongside the RNG, for live damage rolls.
    pub fn parts(&mut self) -> (&BattleState, &mut dyn BattleRng) {
        (&*self.state, &mut *self.rng)
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Rolls a percentage chance. 100 or more always succeeds, 0 never does.
    pub fn roll_pct(&mut self, chance_pct: u8) -> bool {
        match chance_pct {
            0 => false,
            100..=u8::MAX => true,
            pct => self.rng.roll_d100() <= pct as u32,
        }
    }

    // ========================================================================
    // Primitive mutations
    // ========================================================================

    /// Removes HP from a living combatant and reports a defeat.
    ///
    /// Returns the HP actually lost. Emits no damage notification of its own.
    pub fn inflict(&mut self, target: CombatantId, amount: u32) -> u32 {
        let Some(combatant) = self.state.get_mut(target) else {
            return 0;
        };
        if !combatant.is_alive() {
            return 0;
        }
        let lost = combatant.stats.apply_damage(amount);
        let defeated = !combatant.is_alive();
        if defeated {
            debug!(target = %target, "combatant defeated");
            self.emit(BattleEvent::Defeated { target });
        }
        lost
    }

    /// Damage from a non-move source, with a notification.
    pub fn damage(&mut self, target: CombatantId, amount: u32) -> u32 {
        let alive = self.state.get(target).is_some_and(|c| c.is_alive());
        if !alive || amount == 0 {
            return 0;
        }
        self.emit(BattleEvent::Damaged { target, amount });
        self.inflict(target, amount)
    }

    pub fn heal(&mut self, target: CombatantId, amount: u32) -> u32 {
        let Some(combatant) = self.state.get_mut(target) else {
            return 0;
        };
        if !combatant.is_alive() {
            return 0;
        }
        let restored = combatant.stats.apply_healing(amount);
        if restored > 0 {
            self.emit(BattleEvent::Healed {
                target,
                amount: restored,
            });
        }
        restored
    }

    /// Shifts a stage, clamped to the table. Returns the applied change.
    pub fn change_stage(&mut self, target: CombatantId, stat: Stat, delta: i8) -> i8 {
        let Some(combatant) = self.state.get_mut(target) else {
            return 0;
        };
        if !combatant.is_alive() {
            return 0;
        }
        let applied = combatant.stages.shift(stat, delta);
        let stage = combatant.stages.get(stat);
        if applied == 0 {
            debug!(target = %target, stat = %stat, stage, "stage already at limit");
            return 0;
        }
        self.emit(BattleEvent::StatStageChanged {
            target,
            stat,
            delta: applied,
            stage,
        });
        applied
    }

    pub fn set_tag(&mut self, target: CombatantId, tag: CombatTags) {
        match self.state.get_mut(target) {
            Some(combatant) if combatant.is_alive() => combatant.tags.insert(tag),
            _ => {}
        }
    }

    /// Removes every negative status from `target`.
    pub fn cleanse(&mut self, target: CombatantId) {
        let removed = match self.state.get_mut(target) {
            Some(combatant) if combatant.is_alive() => combatant.statuses.cleanse(),
            _ => return,
        };
        for kind in removed {
            self.emit(BattleEvent::StatusRemoved { target, kind });
        }
    }

    /// Runs the status-applied dispatch and stores the status unless cancelled.
    ///
    /// Target abilities observe first and may cancel; the applier's abilities
    /// observe afterwards and see the flag. Returns true if the status landed.
    pub fn apply_status(
        &mut self,
        target: CombatantId,
        source: Option<CombatantId>,
        kind: StatusKind,
        duration: u8,
    ) -> bool {
        let Some(defs) = self.live_ability_defs(target) else {
            return false;
        };

        let mut event = StatusEvent {
            target,
            source,
            kind,
            duration,
            cancelled: false,
        };
        for def in &defs {
            dispatch::on_status_received(def, &mut event);
        }

        if !event.cancelled {
            let outcome = self
                .state
                .get_mut(target)
                .map(|c| c.statuses.apply(kind, duration));
            if outcome == Some(ApplyOutcome::Full) {
                debug!(target = %target, status = %kind, "status list full");
                event.cancelled = true;
            }
        }

        if event.cancelled {
            self.emit(BattleEvent::StatusBlocked { target, kind });
        } else {
            self.emit(BattleEvent::StatusApplied {
                target,
                kind,
                duration,
            });
        }

        if let Some(applier) = source {
            let pending: Vec<_> = match self.state.get(applier) {
                Some(owner) => owner
                    .abilities
                    .iter()
                    .map(|a| {
                        (
                            a.def.id.clone(),
                            dispatch::on_status_inflicted(&a.def, owner, &event),
                        )
                    })
                    .collect(),
                None => Vec::new(),
            };
            for (ability, reactions) in pending {
                self.apply(applier, &ability, reactions);
            }
        }

        !event.cancelled
    }

    // ========================================================================
    // Reaction dispatch
    // ========================================================================

    /// Applies the reactions produced by one ability, in order.
    pub fn apply(&mut self, owner: CombatantId, ability: &str, reactions: Vec<Reaction>) {
        if reactions.is_empty() {
            return;
        }
        debug!(owner = %owner, ability, count = reactions.len(), "ability activated");
        self.emit(BattleEvent::AbilityActivated {
            owner,
            ability: ability.to_string(),
        });
        for reaction in reactions {
            self.apply_reaction(reaction);
        }
    }

    fn apply_reaction(&mut self, reaction: Reaction) {
        match reaction {
            Reaction::Heal { target, amount } => {
                self.heal(target, amount);
            }
            Reaction::Damage { target, amount } => {
                self.damage(target, amount);
            }
            Reaction::StageChange {
                target,
                stat,
                delta,
            } => {
                self.change_stage(target, stat, delta);
            }
            Reaction::ApplyStatus {
                target,
                source,
                kind,
                duration,
                chance_pct,
            } => {
                if self.roll_pct(chance_pct) {
                    self.apply_status(target, source, kind, duration);
                }
            }
        }
    }

    /// Dispatches a "reaction after hit" event.
    ///
    /// Order: attacker on-hit, defender on-damaged, attacker on-kill (if the
    /// defender fell), defender on-crit-received (if critical).
    pub fn after_hit(&mut self, mv: &MoveDef, event: ReactionEvent) {
        let attacker_defs: Vec<Arc<AbilityDef>> = self
            .ability_defs(event.attacker)
            .into_iter()
            .chain(mv.abilities.iter().cloned())
            .collect();
        let defender_defs = self.ability_defs(event.defender);

        for def in &attacker_defs {
            self.apply(event.attacker, &def.id, dispatch::on_hit(def, &event));
        }
        for def in &defender_defs {
            self.apply(event.defender, &def.id, dispatch::on_damaged(def, &event));
        }
        if event.defeated {
            for def in &attacker_defs {
                self.apply(event.attacker, &def.id, dispatch::on_kill(def, &event));
            }
        }
        if event.result.critical {
            for def in &defender_defs {
                self.apply(event.defender, &def.id, dispatch::on_crit_received(def, &event));
            }
        }
    }

    /// Fires a lifecycle event for one active combatant.
    ///
    /// Ability state is copied out, updated by the hook and written back before
    /// the hook's reactions are applied.
    pub fn lifecycle(&mut self, owner: CombatantId, event: LifecycleEvent) {
        let count = match self.state.get(owner) {
            Some(c) if c.is_active() => c.abilities.len(),
            _ => return,
        };

        for index in 0..count {
            let (def, reactions) = {
                let view = self.state.view();
                let Some(combatant) = view.get(owner) else {
                    return;
                };
                let Some(instance) = combatant.abilities.get(index) else {
                    return;
                };
                let mut ability_state = instance.state;
                let reactions =
                    dispatch::on_lifecycle(&instance.def, &mut ability_state, &view, combatant, event);
                let def = instance.def.clone();
                if ability_state != instance.state {
                    if let Some(slot) = self
                        .state
                        .get_mut(owner)
                        .and_then(|c| c.abilities.get_mut(index))
                    {
                        slot.state = ability_state;
                    }
                }
                (def, reactions)
            };
            self.apply(owner, &def.id, reactions);
        }
    }

    /// Spends a charged Vigilance to clear `DAZED`. Returns true on success.
    pub fn shake_off_daze(&mut self, actor: CombatantId) -> bool {
        let Some(combatant) = self.state.get_mut(actor) else {
            return false;
        };
        let Some(index) = dispatch::vigilance_ready(combatant) else {
            return false;
        };
        combatant.tags.remove(CombatTags::DAZED);
        let ability = match combatant.abilities.get_mut(index) {
            Some(instance) => {
                instance.state.charged = false;
                instance.def.id.clone()
            }
            None => return false,
        };
        self.emit(BattleEvent::AbilityActivated {
            owner: actor,
            ability,
        });
        true
    }

    fn ability_defs(&self, owner: CombatantId) -> Vec<Arc<AbilityDef>> {
        self.state
            .get(owner)
            .map(|c| c.abilities.iter().map(|a| a.def.clone()).collect())
            .unwrap_or_default()
    }

    fn live_ability_defs(&self, owner: CombatantId) -> Option<Vec<Arc<AbilityDef>>> {
        match self.state.get(owner) {
            Some(c) if c.is_alive() => Some(c.abilities.iter().map(|a| a.def.clone()).collect()),
            _ => None,
        }
    }
}
