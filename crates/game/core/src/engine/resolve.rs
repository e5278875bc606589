//! Action selection and resolution.

use std::sync::Arc;

use tracing::debug;

use crate::abilities::{Dispatcher, LifecycleEvent, ReactionEvent, dispatch};
use crate::action::{
    ActionChoice, EffectTarget, MoveDef, MoveEffect, MoveTags, QueuedAction, SWITCH_PRIORITY,
    resolve_targets, sort_queue,
};
use crate::ai;
use crate::combat::{DamageContext, DamageResult, Roller, resolve_damage};
use crate::config::CombatRules;
use crate::env::{BattleRng, ElementMatrix};
use crate::events::{BattleEvent, FailReason, SkipReason, TargetResult};
use crate::state::{CombatTags, CombatantId, Side, StatusKind};
use crate::stats::{Stat, effective_stat};

use super::lifecycle::replace_defeated;
use super::phase::BattlePhase;
use super::{BattleEngine, is_manual};

impl<R: BattleRng> BattleEngine<R> {
    /// Builds and sorts the round's queue once all player input is in.
    pub(super) fn select_actions(&mut self) {
        if !self.awaiting_input().is_empty() {
            return;
        }

        let mut submissions = std::mem::take(&mut self.submissions);
        submissions.sort_by_key(|s| s.slot);
        let mut choices: Vec<(CombatantId, ActionChoice)> =
            submissions.into_iter().map(|s| (s.actor, s.choice)).collect();

        let ai_actors: Vec<CombatantId> = self
            .state
            .combatants
            .iter()
            .filter(|c| c.is_active() && !is_manual(c))
            .map(|c| c.id)
            .collect();
        for id in ai_actors {
            let ctx = DamageContext {
                view: self.state.view(),
                elements: &self.elements,
                rules: &self.config.rules,
            };
            let choice = ai::choose_action(ctx, &self.ai, id, &mut self.rng);
            choices.push((id, choice));
        }

        let view = self.state.view();
        let mut queue = Vec::with_capacity(choices.len());
        for (sequence, (actor, choice)) in choices.into_iter().enumerate() {
            let Some(c) = view.get(actor) else {
                continue;
            };
            let priority = match choice {
                ActionChoice::UseMove { move_index, .. } => c
                    .moves
                    .get(move_index)
                    .map(|mv| dispatch::action_priority(c, mv))
                    .unwrap_or(0),
                ActionChoice::Switch { .. } => SWITCH_PRIORITY,
                ActionChoice::Stall => 0,
            };
            let agility = effective_stat(&view, c, Stat::Agility, &self.config.rules);
            queue.push(QueuedAction {
                actor,
                choice,
                priority,
                agility,
                sequence: sequence as u32,
            });
        }
        sort_queue(&mut queue);
        debug!(
            order = ?queue.iter().map(|q| q.actor.0).collect::<Vec<_>>(),
            "action queue built"
        );
        self.queue = queue.into();
        self.set_phase(BattlePhase::ActionResolution);
    }

    /// Resolves the next queued action.
    pub(super) fn resolve_next(&mut self, events: &mut Vec<BattleEvent>) {
        let Some(action) = self.queue.pop_front() else {
            self.set_phase(BattlePhase::EndOfTurn);
            return;
        };

        let elements = Arc::clone(&self.elements);
        let rules = self.config.rules;
        {
            let mut fx = Dispatcher::new(&mut self.state, &mut self.rng, events);
            execute(&mut fx, &elements, &rules, action);
            replace_defeated(&mut fx);
        }

        let decided = !self.state.side_has_living(Side::Player)
            || !self.state.side_has_living(Side::Enemy);
        if decided {
            debug!("a side has been wiped out; skipping remaining actions");
            self.queue.clear();
        }
        if self.queue.is_empty() {
            self.set_phase(BattlePhase::EndOfTurn);
        }
    }
}

fn execute(
    fx: &mut Dispatcher<'_>,
    elements: &ElementMatrix,
    rules: &CombatRules,
    action: QueuedAction,
) {
    let actor = action.actor;
    let active = fx.state().get(actor).is_some_and(|c| c.is_active());
    if !active {
        debug!(actor = %actor, "actor no longer active; action dropped");
        return;
    }

    if let Some(reason) = incapacitation(fx, actor) {
        debug!(actor = %actor, reason = %reason, "action skipped");
        fx.emit(BattleEvent::ActionSkipped { actor, reason });
        return;
    }

    fx.emit(BattleEvent::ActionDeclared {
        actor,
        choice: action.choice,
    });

    match action.choice {
        ActionChoice::Stall => {}
        ActionChoice::Switch { to } => execute_switch(fx, actor, to),
        ActionChoice::UseMove { move_index, target } => {
            execute_move(fx, elements, rules, actor, move_index, target)
        }
    }
}

fn incapacitation(fx: &mut Dispatcher<'_>, actor: CombatantId) -> Option<SkipReason> {
    let c = fx.state().get(actor)?;
    if c.statuses.has(StatusKind::Stunned) {
        return Some(SkipReason::Stunned);
    }
    if c.tags.contains(CombatTags::DAZED) && !fx.shake_off_daze(actor) {
        return Some(SkipReason::Dazed);
    }
    None
}

fn execute_switch(fx: &mut Dispatcher<'_>, actor: CombatantId, to: CombatantId) {
    let (side, slot) = match fx.state().get(actor) {
        Some(c) => match c.slot {
            Some(slot) => (c.side, slot),
            None => return,
        },
        None => return,
    };
    let valid = fx
        .state()
        .get(to)
        .is_some_and(|c| c.side == side && c.is_alive() && !c.is_on_field());
    if !valid {
        debug!(actor = %actor, to = %to, "switch target unavailable");
        return;
    }

    if let Some(out) = fx.state_mut().get_mut(actor) {
        out.slot = None;
        out.stages.reset();
        out.tags = CombatTags::empty();
    }
    if let Some(incoming) = fx.state_mut().get_mut(to) {
        incoming.slot = Some(slot);
    }
    fx.emit(BattleEvent::SwitchedIn {
        incoming: to,
        outgoing: Some(actor),
        slot,
    });
    fx.lifecycle(to, LifecycleEvent::EnterField);
}

fn execute_move(
    fx: &mut Dispatcher<'_>,
    elements: &ElementMatrix,
    rules: &CombatRules,
    actor: CombatantId,
    move_index: usize,
    chosen: Option<CombatantId>,
) {
    let Some((mv, has_mana, silenced)) = fx.state().get(actor).and_then(|c| {
        c.moves.get(move_index).map(|mv| {
            (
                Arc::clone(mv),
                c.stats.has_mana(mv.mana_cost),
                c.statuses.has(StatusKind::Silenced),
            )
        })
    }) else {
        debug!(actor = %actor, move_index, "unknown move index");
        return;
    };

    if !has_mana {
        fx.emit(BattleEvent::MoveFailed {
            actor,
            reason: FailReason::NotEnoughMana,
        });
        return;
    }
    if silenced && mv.mana_cost > 0 {
        fx.emit(BattleEvent::MoveFailed {
            actor,
            reason: FailReason::Silenced,
        });
        return;
    }

    let targets = {
        let view = fx.state().view();
        match view.get(actor) {
            Some(c) => resolve_targets(&view, c, &mv, chosen),
            None => return,
        }
    };
    if targets.is_empty() {
        fx.emit(BattleEvent::MoveFailed {
            actor,
            reason: FailReason::NoTarget,
        });
        return;
    }

    if let Some(c) = fx.state_mut().get_mut(actor) {
        c.stats.spend_mana(mv.mana_cost);
    }

    let multi = if targets.len() > 1 {
        rules.multi_target_factor
    } else {
        1.0
    };
    let results: Vec<TargetResult> = targets
        .iter()
        .filter_map(|&target| hit(fx, elements, rules, actor, target, &mv, multi))
        .collect();

    fx.emit(BattleEvent::ActionExecuted {
        actor,
        move_id: mv.id.clone(),
        results: results.clone(),
    });

    let mut dealt = 0u32;
    for outcome in &results {
        let lost = fx.inflict(outcome.target, outcome.result.damage);
        dealt += lost;
        let defeated = fx.state().get(outcome.target).is_some_and(|c| !c.is_alive());

        if mv.is_damaging() && !outcome.blocked {
            fx.after_hit(
                &mv,
                ReactionEvent {
                    attacker: actor,
                    defender: outcome.target,
                    result: outcome.result,
                    defeated: defeated && lost > 0,
                },
            );
        }

        if !outcome.blocked && !outcome.result.graze {
            for effect in mv.effects.iter().filter(|e| e.recipient() == EffectTarget::Target) {
                apply_effect(fx, actor, outcome.target, effect, dealt);
            }
        }
    }

    for effect in mv.effects.iter().filter(|e| e.recipient() == EffectTarget::User) {
        apply_effect(fx, actor, actor, effect, dealt);
    }

    if mv.tags.contains(MoveTags::SELF_DESTRUCT) {
        let hp = fx.state().get(actor).map_or(0, |c| c.stats.current_hp());
        fx.inflict(actor, hp);
    }
}

/// Runs the pipeline against one target without applying anything.
fn hit(
    fx: &mut Dispatcher<'_>,
    elements: &ElementMatrix,
    rules: &CombatRules,
    actor: CombatantId,
    target: CombatantId,
    mv: &MoveDef,
    multi: f64,
) -> Option<TargetResult> {
    let (state, rng) = fx.parts();
    let attacker = state.get(actor)?;
    let defender = state.get(target)?;
    if !defender.is_alive() {
        return None;
    }

    let mut result = if mv.is_damaging() {
        let ctx = DamageContext {
            view: state.view(),
            elements,
            rules,
        };
        let mut roller = Roller::live(rng);
        resolve_damage(&ctx, attacker, defender, mv, multi, &mut roller)
    } else {
        DamageResult::none()
    };

    let blocked = mv.is_damaging()
        && target != actor
        && defender.tags.contains(CombatTags::PROTECTED)
        && !mv.tags.contains(MoveTags::PIERCING);
    if blocked {
        debug!(target = %target, "hit blocked by protection");
        result.damage = 0;
    }

    Some(TargetResult {
        target,
        result,
        blocked,
    })
}

fn apply_effect(
    fx: &mut Dispatcher<'_>,
    actor: CombatantId,
    recipient: CombatantId,
    effect: &MoveEffect,
    dealt: u32,
) {
    match *effect {
        MoveEffect::ApplyStatus {
            status,
            duration,
            chance_pct,
            ..
        } => {
            if fx.roll_pct(chance_pct) {
                fx.apply_status(recipient, Some(actor), status, duration);
            }
        }
        MoveEffect::StatStage {
            stat,
            stages,
            chance_pct,
            ..
        } => {
            if fx.roll_pct(chance_pct) {
                fx.change_stage(recipient, stat, stages);
            }
        }
        MoveEffect::Heal { percent, .. } => {
            let max_hp = fx.state().get(recipient).map_or(0, |c| c.stats.max_hp());
            fx.heal(recipient, dispatch::share_of(max_hp, percent));
        }
        MoveEffect::Recoil { percent } => {
            let amount = u32::try_from(dealt as u64 * percent as u64 / 100).unwrap_or(u32::MAX);
            if amount > 0 {
                fx.emit(BattleEvent::Recoiled { actor, amount });
                fx.inflict(actor, amount);
            }
        }
        MoveEffect::Cleanse { .. } => fx.cleanse(recipient),
        MoveEffect::Protect => fx.set_tag(actor, CombatTags::PROTECTED),
        MoveEffect::Daze { chance_pct } => {
            if fx.roll_pct(chance_pct) {
                fx.set_tag(recipient, CombatTags::DAZED);
            }
        }
    }
}
