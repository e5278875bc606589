//! Candidate scoring.
//!
//! Every legal (move, target) pair starts at [`AiConfig::base_score`] and
//! collects per-target terms. Harming an ally or helping an enemy scores
//! [`MISDIRECTED`], which no combination of other terms can offset.

use crate::action::{AiHint, EffectTarget, MoveDef, MoveEffect};
use crate::abilities::dispatch;
use crate::combat::{DamageContext, DamageResult, Roller, resolve_damage};
use crate::env::BattleRng;
use crate::state::{CombatTags, Combatant};
use crate::stats::{Stat, effective_stat};

use super::candidates::usable_moves;
use super::config::AiConfig;

pub const MISDIRECTED: i32 = -1000;
pub const IMMUNE: i32 = -50;
pub const KILL: i32 = 80;
pub const SAFE_KILL: i32 = 120;
pub const BEST_DAMAGE: i32 = 40;
pub const DAMAGE_SCALE_CAP: i32 = 30;
pub const RESISTED: i32 = -10;
pub const USEFUL_EFFECT: i32 = 30;
pub const REDUNDANT: i32 = -20;
pub const NEAR_FULL_HP_PCT: u32 = 90;
pub const OPENER: i32 = 15;
pub const FINISHER: i32 = 20;
pub const FINISHER_HP_PCT: u32 = 25;

/// Everything scoring reads.
pub struct ScoringContext<'a> {
    pub damage: DamageContext<'a>,
    pub config: &'a AiConfig,
}

impl ScoringContext<'_> {
    fn simulate(
        &self,
        rng: &mut dyn BattleRng,
        actor: &Combatant,
        target: &Combatant,
        mv: &MoveDef,
        multi_target_factor: f64,
    ) -> DamageResult {
        let mut roller = Roller::simulated(rng, self.config.variance);
        resolve_damage(&self.damage, actor, target, mv, multi_target_factor, &mut roller)
    }

    /// Highest simulated single-target damage any usable move deals to `target`.
    fn best_damage(&self, rng: &mut dyn BattleRng, actor: &Combatant, target: &Combatant) -> u32 {
        usable_moves(actor)
            .filter(|(_, mv)| mv.is_damaging())
            .map(|(_, mv)| self.simulate(rng, actor, target, mv, 1.0).damage)
            .max()
            .unwrap_or(0)
    }
}

/// Scores using `mv` against the resolved `targets`.
pub fn score_move(
    ctx: &ScoringContext<'_>,
    rng: &mut dyn BattleRng,
    actor: &Combatant,
    mv: &MoveDef,
    targets: &[&Combatant],
) -> i32 {
    let mut score = ctx.config.base_score;
    let multi = if targets.len() > 1 {
        ctx.damage.rules.multi_target_factor
    } else {
        1.0
    };

    for target in targets {
        if mv.is_damaging() {
            score += score_damage(ctx, rng, actor, mv, target, multi);
        } else {
            score += mv
                .effects
                .iter()
                .filter(|e| e.recipient() == EffectTarget::Target)
                .map(|e| score_effect(e, actor, target))
                .sum::<i32>();
        }
        if mv.ai_hint == Some(AiHint::Finisher)
            && !target.is_ally_of(actor)
            && target.stats.hp_percent() <= FINISHER_HP_PCT
        {
            score += FINISHER;
        }
    }

    if !mv.is_damaging() {
        score += mv
            .effects
            .iter()
            .filter(|e| e.recipient() == EffectTarget::User)
            .map(|e| score_effect(e, actor, actor))
            .sum::<i32>();
    }

    match mv.ai_hint {
        Some(AiHint::SelfDestruct) => {
            score += (100 - actor.stats.hp_percent().min(100) as i32) / 2;
        }
        Some(AiHint::Opener) => {
            score += if ctx.damage.view.round() == 1 { OPENER } else { -OPENER };
        }
        _ => {}
    }

    score
}

fn score_damage(
    ctx: &ScoringContext<'_>,
    rng: &mut dyn BattleRng,
    actor: &Combatant,
    mv: &MoveDef,
    target: &Combatant,
    multi: f64,
) -> i32 {
    if target.is_ally_of(actor) {
        return MISDIRECTED;
    }

    let result = ctx.simulate(rng, actor, target, mv, multi);
    if result.is_immune() {
        return IMMUNE;
    }

    let hp = target.stats.current_hp().max(1);
    if result.damage >= hp {
        return if outpaces(ctx, actor, target, mv) {
            SAFE_KILL
        } else {
            KILL
        };
    }

    let best = ctx.best_damage(rng, actor, target);
    if result.damage > 0 && result.damage >= best {
        return BEST_DAMAGE;
    }

    let scaled = ((result.damage as u64 * DAMAGE_SCALE_CAP as u64) / hp as u64) as i32;
    let mut score = scaled.min(DAMAGE_SCALE_CAP);
    if result.is_resisted() {
        score += RESISTED;
    }
    score
}

/// Higher priority, or equal priority and higher agility.
fn outpaces(ctx: &ScoringContext<'_>, actor: &Combatant, target: &Combatant, mv: &MoveDef) -> bool {
    let priority = dispatch::action_priority(actor, mv);
    if priority != 0 {
        return priority > 0;
    }
    let view = &ctx.damage.view;
    let rules = ctx.damage.rules;
    effective_stat(view, actor, Stat::Agility, rules) > effective_stat(view, target, Stat::Agility, rules)
}

/// Scores one secondary effect on `recipient`.
fn score_effect(effect: &MoveEffect, actor: &Combatant, recipient: &Combatant) -> i32 {
    let ally = recipient.is_ally_of(actor);
    let helpful_or_harmful = |harmful: bool, redundant: bool| {
        if harmful == ally {
            MISDIRECTED
        } else if redundant {
            REDUNDANT
        } else {
            USEFUL_EFFECT
        }
    };

    match effect {
        MoveEffect::ApplyStatus { status, .. } => {
            helpful_or_harmful(status.is_negative(), recipient.statuses.has(*status))
        }
        MoveEffect::StatStage { stat, stages, .. } => {
            helpful_or_harmful(*stages < 0, recipient.stages.is_capped(*stat, *stages))
        }
        MoveEffect::Daze { .. } => {
            helpful_or_harmful(true, recipient.tags.contains(CombatTags::DAZED))
        }
        MoveEffect::Heal { .. } => {
            if !ally {
                return MISDIRECTED;
            }
            let hp_pct = recipient.stats.hp_percent();
            if hp_pct >= NEAR_FULL_HP_PCT {
                REDUNDANT
            } else {
                (100 - hp_pct) as i32
            }
        }
        MoveEffect::Cleanse { .. } => {
            let afflicted = recipient.statuses.iter().any(|s| s.kind.is_negative());
            helpful_or_harmful(false, !afflicted)
        }
        MoveEffect::Protect => {
            if recipient.tags.contains(CombatTags::PROTECTED) {
                REDUNDANT
            } else {
                0
            }
        }
        MoveEffect::Recoil { .. } => 0,
    }
}
