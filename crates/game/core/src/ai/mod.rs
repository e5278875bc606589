//! AI evaluator for non-player combatants.
//!
//! Scores every legal (move, target) pair with the damage pipeline in
//! simulation mode, shuffles the candidates and picks the first best one.
//! A non-positive best score, or no candidates at all, means stalling.

mod candidates;
mod config;
pub mod scoring;

use tracing::debug;

use crate::action::{ActionChoice, resolve_targets};
use crate::combat::{DamageContext, VarianceMode};
use crate::env::BattleRng;
use crate::state::CombatantId;

pub use candidates::{Candidate, enumerate, usable_moves};
pub use config::AiConfig;
pub use scoring::{ScoringContext, score_move};

/// Scores every candidate for `actor`. Candidates without any target are dropped.
pub fn score_candidates(
    ctx: &ScoringContext<'_>,
    actor_id: CombatantId,
    rng: &mut dyn BattleRng,
) -> Vec<Candidate> {
    let view = ctx.damage.view;
    let Some(actor) = view.get(actor_id) else {
        return Vec::new();
    };

    let mut scored = Vec::new();
    for mut candidate in enumerate(&view, actor) {
        let Some(mv) = actor.moves.get(candidate.move_index) else {
            continue;
        };
        let targets: Vec<_> = resolve_targets(&view, actor, mv, candidate.target)
            .into_iter()
            .filter_map(|id| view.get(id))
            .collect();
        if targets.is_empty() {
            continue;
        }
        candidate.score = score_move(ctx, rng, actor, mv, &targets);
        if ctx.config.variance == VarianceMode::Random && ctx.config.jitter > 0 {
            candidate.score += rng.gen_range(ctx.config.jitter as usize + 1) as i32;
        }
        scored.push(candidate);
    }
    scored
}

/// Picks an action for `actor_id`.
pub fn choose_action<R: BattleRng>(
    damage: DamageContext<'_>,
    config: &AiConfig,
    actor_id: CombatantId,
    rng: &mut R,
) -> ActionChoice {
    let ctx = ScoringContext { damage, config };
    let mut candidates = score_candidates(&ctx, actor_id, rng);
    rng.shuffle(&mut candidates);

    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        if best.is_none_or(|b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    match best {
        Some(choice) if choice.score > 0 => {
            debug!(
                actor = %actor_id,
                move_index = choice.move_index,
                target = ?choice.target,
                score = choice.score,
                "ai selected move"
            );
            ActionChoice::UseMove {
                move_index: choice.move_index,
                target: choice.target,
            }
        }
        _ => {
            debug!(actor = %actor_id, "ai stalls");
            ActionChoice::Stall
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::action::{EffectTarget, MoveDef, MoveEffect, TargetKind};
    use crate::config::CombatRules;
    use crate::env::{ElementMatrix, PcgRng};
    use crate::state::{BattleState, Combatant, Side, StatusKind};
    use crate::stats::CombatantStats;

    fn unit(id: u16, side: Side, slot: u8) -> Combatant {
        Combatant::new(CombatantId(id), format!("u{id}"), side)
            .at_slot(slot)
            .with_stats(CombatantStats::new(20, 100, 20).with_attributes(30, 30, 30, 30))
    }

    fn pick(state: &BattleState, actor: CombatantId, seed: u64) -> ActionChoice {
        let rules = CombatRules::default();
        let matrix = ElementMatrix::new();
        let ctx = DamageContext {
            view: state.view(),
            elements: &matrix,
            rules: &rules,
        };
        let mut rng = PcgRng::seed_from_u64(seed);
        choose_action(ctx, &AiConfig::default(), actor, &mut rng)
    }

    #[test]
    fn damage_move_never_aimed_at_ally() {
        let hurl = Arc::new(
            MoveDef::new("hurl", "Hurl")
                .with_power(60)
                .with_target(TargetKind::AnyOther),
        );
        let state = BattleState::new(vec![
            unit(1, Side::Enemy, 0).with_move(hurl),
            unit(2, Side::Enemy, 1),
            unit(3, Side::Player, 0),
        ]);
        for seed in 0..20 {
            assert_eq!(
                pick(&state, CombatantId(1), seed),
                ActionChoice::UseMove {
                    move_index: 0,
                    target: Some(CombatantId(3)),
                }
            );
        }
    }

    #[test]
    fn buff_never_aimed_at_enemy() {
        let rally = Arc::new(
            MoveDef::new("rally", "Rally")
                .with_target(TargetKind::AnyOther)
                .with_effect(MoveEffect::ApplyStatus {
                    status: StatusKind::Empowered,
                    duration: 3,
                    chance_pct: 100,
                    target: EffectTarget::Target,
                }),
        );
        let state = BattleState::new(vec![
            unit(1, Side::Enemy, 0).with_move(rally),
            unit(2, Side::Enemy, 1),
            unit(3, Side::Player, 0),
        ]);
        for seed in 0..20 {
            assert_eq!(
                pick(&state, CombatantId(1), seed),
                ActionChoice::UseMove {
                    move_index: 0,
                    target: Some(CombatantId(2)),
                }
            );
        }
    }

    #[test]
    fn only_misdirected_options_stall() {
        let mend = Arc::new(
            MoveDef::new("mend", "Mend")
                .with_target(TargetKind::SingleEnemy)
                .with_effect(MoveEffect::Heal {
                    percent: 50,
                    target: EffectTarget::Target,
                }),
        );
        let mut foe = unit(3, Side::Player, 0);
        foe.stats.set_current_hp(10);
        let state = BattleState::new(vec![unit(1, Side::Enemy, 0).with_move(mend), foe]);
        assert_eq!(pick(&state, CombatantId(1), 7), ActionChoice::Stall);
    }

    #[test]
    fn no_moves_means_stall() {
        let state = BattleState::new(vec![unit(1, Side::Enemy, 0), unit(2, Side::Player, 0)]);
        assert_eq!(pick(&state, CombatantId(1), 1), ActionChoice::Stall);
    }

    #[test]
    fn silenced_actor_skips_mana_moves() {
        let bolt = Arc::new(MoveDef::new("bolt", "Bolt").with_power(80).with_mana_cost(5));
        let mut caster = unit(1, Side::Enemy, 0).with_move(bolt);
        caster.statuses.apply(StatusKind::Silenced, 2);
        let state = BattleState::new(vec![caster, unit(2, Side::Player, 0)]);
        assert_eq!(pick(&state, CombatantId(1), 3), ActionChoice::Stall);
    }

    #[test]
    fn kill_is_preferred_over_chip_damage() {
        let jab = Arc::new(MoveDef::new("jab", "Jab").with_power(10));
        let mut weak = unit(3, Side::Player, 0);
        weak.stats.set_current_hp(3);
        let state = BattleState::new(vec![
            unit(1, Side::Enemy, 0).with_move(jab),
            unit(2, Side::Player, 1),
            weak,
        ]);
        assert_eq!(
            pick(&state, CombatantId(1), 11),
            ActionChoice::UseMove {
                move_index: 0,
                target: Some(CombatantId(3)),
            }
        );
    }
}
