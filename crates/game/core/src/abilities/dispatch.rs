//! Dispatch rules: which abilities observe an event, and in what order.
//!
//! Order is always the owner's attachment order, followed by the abilities
//! attached to the move being used (attacker-side events only). Read-only
//! queries live here; hooks that produce [`Reaction`]s are evaluated here and
//! applied by [`super::Dispatcher`].

use tracing::debug;

use crate::action::MoveDef;
use crate::state::{BattleView, CombatTags, Combatant};
use crate::stats::Stat;

use super::events::{
    ActionEvent, CheckHitEvent, DamageCalcEvent, LifecycleEvent, ReactionEvent, StatCalcEvent,
    StatusEvent,
};
use super::{AbilityDef, AbilityKind, AbilityState, Reaction};

/// `pct` percent of `value`, at least 1, saturating at `u32::MAX`.
pub(crate) fn share_of(value: u32, pct: u8) -> u32 {
    let share = value as u64 * pct as u64 / 100;
    u32::try_from(share).unwrap_or(u32::MAX).max(1)
}

/// Abilities observing an attacker-side event: own, then the move's.
fn attacker_abilities<'a>(
    owner: &'a Combatant,
    mv: &'a MoveDef,
) -> impl Iterator<Item = (&'a AbilityDef, AbilityState)> + 'a {
    owner
        .abilities
        .iter()
        .map(|a| (a.def.as_ref(), a.state))
        .chain(mv.abilities.iter().map(|d| (d.as_ref(), AbilityState::default())))
}

// ============================================================================
// Read-only queries
// ============================================================================

/// Base attribute after "did stat calc" observers.
pub fn stat_calc(view: &BattleView<'_>, owner: &Combatant, stat: Stat) -> i32 {
    let mut event = StatCalcEvent::new(stat, owner.stats.base(stat));
    for ability in &owner.abilities {
        match ability.kind() {
            AbilityKind::StatModifier { modifiers } => {
                for (modified, flat) in modifiers {
                    if *modified == stat {
                        event.bonuses.add(crate::stats::Bonus::flat(*flat));
                    }
                }
            }
            AbilityKind::Cornered {
                stat: boosted,
                hp_threshold_pct,
                enemy_count_threshold,
                bonus_pct,
            } if *boosted == stat => {
                let low_hp = owner.stats.hp_percent() <= *hp_threshold_pct as u32;
                let outnumbered = view.enemies_of(owner).count() >= *enemy_count_threshold as usize;
                if low_hp || outnumbered {
                    event.bonuses.add(crate::stats::Bonus::increased(*bonus_pct));
                }
            }
            _ => {}
        }
    }
    event.resolve()
}

/// Crit multiplier and accuracy increase for one hit attempt.
pub fn check_hit(attacker: &Combatant, mv: &MoveDef) -> CheckHitEvent {
    let mut event = CheckHitEvent::default();
    for (def, _) in attacker_abilities(attacker, mv) {
        match &def.kind {
            AbilityKind::KeenEye { multiplier_pct } => {
                event.crit_multiplier += *multiplier_pct as f64 / 100.0;
            }
            AbilityKind::Precision { bonus_pct } => {
                event.accuracy_increase += bonus_pct;
            }
            _ => {}
        }
    }
    event
}

pub fn crit_multiplier(attacker: &Combatant, mv: &MoveDef) -> f64 {
    check_hit(attacker, mv).crit_multiplier
}

pub fn accuracy_bonus(attacker: &Combatant, mv: &MoveDef) -> i32 {
    check_hit(attacker, mv).accuracy_increase
}

/// Priority of `mv` after action-modifier observers.
pub fn action_priority(actor: &Combatant, mv: &MoveDef) -> i8 {
    let mut event = ActionEvent {
        priority: mv.priority,
    };
    for (def, _) in attacker_abilities(actor, mv) {
        match def.kind {
            AbilityKind::QuickStrike {
                priority,
                max_hp_pct,
            } if actor.stats.hp_percent() <= max_hp_pct as u32 => {
                event.priority = event.priority.saturating_add(priority);
            }
            _ => {}
        }
    }
    event.priority
}

/// Applies the attacker's outgoing damage modifiers.
pub fn modify_outgoing_damage(event: &mut DamageCalcEvent<'_>) {
    let attacker = event.attacker;
    for (def, state) in attacker_abilities(attacker, event.mv) {
        match &def.kind {
            AbilityKind::LowHpDamageBonus {
                threshold_pct,
                bonus_pct,
            } if attacker.stats.hp_percent() <= *threshold_pct as u32 => {
                event.damage *= 1.0 + *bonus_pct as f64 / 100.0;
            }
            AbilityKind::ElementalBoost { element, bonus_pct }
                if event.mv.elements.contains(element) =>
            {
                event.damage *= 1.0 + *bonus_pct as f64 / 100.0;
            }
            AbilityKind::Escalation {
                bonus_pct_per_stack,
                ..
            } if state.stacks > 0 => {
                event.damage *= 1.0 + (*bonus_pct_per_stack * state.stacks as i32) as f64 / 100.0;
            }
            _ => {}
        }
    }
}

/// Applies the defender's incoming damage modifiers.
pub fn modify_incoming_damage(event: &mut DamageCalcEvent<'_>) {
    for ability in &event.defender.abilities {
        match ability.kind() {
            AbilityKind::DamageReduction { percent, impact }
                if impact.is_none_or(|i| i == event.mv.impact) =>
            {
                event.damage *= 1.0 - (*percent).min(100) as f64 / 100.0;
            }
            _ => {}
        }
    }
}

// ============================================================================
// Reaction hooks
// ============================================================================

/// Attacker-side on-hit hooks, including lifesteal.
pub fn on_hit(def: &AbilityDef, event: &ReactionEvent) -> Vec<Reaction> {
    let damage = event.result.damage;
    match def.kind {
        AbilityKind::Lifesteal { percent } if damage > 0 => {
            let amount = share_of(damage, percent);
            vec![Reaction::Heal {
                target: event.attacker,
                amount,
            }]
        }
        AbilityKind::Venomous {
            status,
            chance_pct,
            duration,
        } if damage > 0 && !event.defeated => vec![Reaction::ApplyStatus {
            target: event.defender,
            source: Some(event.attacker),
            kind: status,
            duration,
            chance_pct,
        }],
        _ => Vec::new(),
    }
}

/// Defender-side on-damaged hooks.
pub fn on_damaged(def: &AbilityDef, event: &ReactionEvent) -> Vec<Reaction> {
    match def.kind {
        AbilityKind::Thorns { percent } if event.result.damage > 0 => {
            let amount = share_of(event.result.damage, percent);
            vec![Reaction::Damage {
                target: event.attacker,
                amount,
            }]
        }
        _ => Vec::new(),
    }
}

/// Attacker-side hooks after the defender fell.
pub fn on_kill(def: &AbilityDef, event: &ReactionEvent) -> Vec<Reaction> {
    match def.kind {
        AbilityKind::Bloodlust { stat, stages } => vec![Reaction::StageChange {
            target: event.attacker,
            stat,
            delta: stages,
        }],
        _ => Vec::new(),
    }
}

/// Defender-side hooks after a critical hit.
pub fn on_crit_received(def: &AbilityDef, event: &ReactionEvent) -> Vec<Reaction> {
    match def.kind {
        AbilityKind::AngerPoint { stat, stages } => vec![Reaction::StageChange {
            target: event.defender,
            stat,
            delta: stages,
        }],
        _ => Vec::new(),
    }
}

/// Target-side status hook. May cancel the event.
pub fn on_status_received(def: &AbilityDef, event: &mut StatusEvent) {
    match &def.kind {
        AbilityKind::StatusImmunity { statuses }
            if !event.cancelled && statuses.contains(&event.kind) =>
        {
            debug!(ability = %def.id, status = %event.kind, "status cancelled by immunity");
            event.cancelled = true;
        }
        _ => {}
    }
}

/// Applier-side status hook. Respects an earlier cancellation.
pub fn on_status_inflicted(def: &AbilityDef, owner: &Combatant, event: &StatusEvent) -> Vec<Reaction> {
    match def.kind {
        AbilityKind::Sadism { heal_pct }
            if !event.cancelled && event.kind.is_negative() && event.target != owner.id =>
        {
            let amount = share_of(owner.stats.max_hp(), heal_pct);
            vec![Reaction::Heal {
                target: owner.id,
                amount,
            }]
        }
        _ => Vec::new(),
    }
}

/// Lifecycle hooks. Stateful kinds update `state` in place.
pub fn on_lifecycle(
    def: &AbilityDef,
    state: &mut AbilityState,
    view: &BattleView<'_>,
    owner: &Combatant,
    event: LifecycleEvent,
) -> Vec<Reaction> {
    match (&def.kind, event) {
        (AbilityKind::Intimidate { stat, stages }, LifecycleEvent::BattleStart)
        | (AbilityKind::Intimidate { stat, stages }, LifecycleEvent::EnterField) => view
            .enemies_of(owner)
            .map(|enemy| Reaction::StageChange {
                target: enemy.id,
                stat: *stat,
                delta: *stages,
            })
            .collect(),
        (AbilityKind::Vigilance, LifecycleEvent::TurnStart) => {
            state.charged = true;
            Vec::new()
        }
        (AbilityKind::Regeneration { percent }, LifecycleEvent::TurnEnd)
            if owner.stats.current_hp() < owner.stats.max_hp() =>
        {
            let amount = share_of(owner.stats.max_hp(), *percent);
            vec![Reaction::Heal {
                target: owner.id,
                amount,
            }]
        }
        (AbilityKind::Escalation { max_stacks, .. }, LifecycleEvent::TurnEnd) => {
            if state.stacks < *max_stacks {
                state.stacks += 1;
                debug!(owner = %owner.id, stacks = state.stacks, "escalation stack gained");
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Index of a charged Vigilance that can clear `DAZED` before acting.
pub fn vigilance_ready(owner: &Combatant) -> Option<usize> {
    if !owner.tags.contains(CombatTags::DAZED) {
        return None;
    }
    owner
        .abilities
        .iter()
        .position(|a| matches!(a.kind(), AbilityKind::Vigilance) && a.state.charged)
}
