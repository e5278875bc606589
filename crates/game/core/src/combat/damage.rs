//! The damage pipeline.
//!
//! # Order
//!
//! ```text
//!  1. zero power            → no damage
//!  2. hit check             → graze on miss or vs Evasive
//!  3. base                  → (((2*lvl/5 + 2) * power * off/def) / 50) + 2
//!  4. × multi-target factor
//!  5. critical roll         → × crit multiplier
//!  6. non-critical buffs    → Empowered / Focused / Fortified
//!  7. × elemental effectiveness
//!  8. × Frozen vulnerability (physical)
//!  9. × variance
//! 10. × graze multiplier
//! 10a. outgoing, then incoming, damage-modifier abilities
//! 11. floor
//! 12. + Burned rider (physical)
//! 13. minimum damage of 1 when step 11 floored a positive value to 0
//! ```
//!
//! The same function serves live resolution and AI simulation; only the
//! [`Roller`] differs. Nothing here mutates battle state.

use tracing::trace;

use crate::abilities::{DamageCalcEvent, dispatch};
use crate::action::{Accuracy, Impact, MoveDef};
use crate::config::CombatRules;
use crate::env::ElementMatrix;
use crate::state::{BattleView, Combatant, StatusKind};
use crate::stats::{Stat, effective_accuracy, effective_stat};

use super::result::DamageResult;
use super::roll::Roller;

/// Read-only inputs shared by every hit in a resolution.
#[derive(Clone, Copy, Debug)]
pub struct DamageContext<'a> {
    pub view: BattleView<'a>,
    pub elements: &'a ElementMatrix,
    pub rules: &'a CombatRules,
}

/// Runs the full pipeline for one attacker/defender pair.
pub fn resolve_damage(
    ctx: &DamageContext<'_>,
    attacker: &Combatant,
    defender: &Combatant,
    mv: &MoveDef,
    multi_target_factor: f64,
    roller: &mut Roller<'_>,
) -> DamageResult {
    let rules = ctx.rules;

    // 1. zero power
    if mv.power == 0 {
        return DamageResult::none();
    }

    // 2. hit check
    let graze = match mv.accuracy {
        Accuracy::TrueHit => false,
        Accuracy::Percent(_) if defender.statuses.has(StatusKind::Evasive) => true,
        Accuracy::Percent(_) => {
            let accuracy = effective_accuracy(attacker, mv, rules).unwrap_or(u32::MAX);
            !roller.hits(accuracy)
        }
    };

    // 3. base
    let level = attacker.stats.level as f64;
    let offense = effective_stat(&ctx.view, attacker, mv.offense, rules).max(0) as f64;
    let defense = effective_stat(&ctx.view, defender, Stat::Tenacity, rules).max(1) as f64;
    let level_factor = (2.0 * level / 5.0).floor() + 2.0;
    let mut damage = ((level_factor * mv.power as f64 * (offense / defense)) / 50.0) + 2.0;

    // 4. multi-target
    damage *= multi_target_factor;

    // 5. critical
    let mut crit_chance = rules.crit_chance * dispatch::crit_multiplier(attacker, mv);
    if defender.statuses.has(StatusKind::Exposed) {
        crit_chance *= 2.0;
    }
    let critical = roller.critical(crit_chance);
    if critical {
        damage *= rules.crit_multiplier;
    }

    // 6. buffs and debuffs, skipped on critical hits
    if !critical {
        let boosted = match mv.impact {
            Impact::Physical => attacker.statuses.has(StatusKind::Empowered),
            Impact::Magical => attacker.statuses.has(StatusKind::Focused),
            Impact::Support => false,
        };
        if boosted {
            damage *= rules.offense_buff_multiplier;
        }
        if defender.statuses.has(StatusKind::Fortified) {
            damage /= rules.defense_buff_multiplier;
        }
    }

    // 7. elements
    let effectiveness = ctx.elements.effectiveness(&mv.elements, &defender.elements);
    damage *= effectiveness;

    // 8. frozen
    if mv.is_physical() && defender.statuses.has(StatusKind::Frozen) {
        damage *= rules.frozen_vulnerability;
    }

    // 9. variance
    damage *= roller.variance(rules);

    // 10. graze
    if graze {
        damage *= rules.graze_multiplier;
    }

    // 10a. abilities
    let mut event = DamageCalcEvent {
        attacker,
        defender,
        mv,
        damage,
    };
    dispatch::modify_outgoing_damage(&mut event);
    dispatch::modify_incoming_damage(&mut event);
    let pre_floor = event.damage.max(0.0);

    // 11. floor
    let mut final_damage = pre_floor.floor() as u32;

    // 12. burn rider
    if mv.is_physical() && pre_floor > 0.0 && defender.statuses.has(StatusKind::Burned) {
        final_damage += (defender.stats.max_hp() / rules.burn_divisor.max(1)).max(1);
    }

    // 13. minimum damage
    if final_damage == 0 && pre_floor > 0.0 {
        final_damage = 1;
    }

    trace!(
        attacker = %attacker.id,
        defender = %defender.id,
        mv = %mv.id,
        pre_floor,
        final_damage,
        critical,
        graze,
        "damage resolved"
    );

    DamageResult {
        damage: final_damage,
        critical,
        graze,
        effectiveness,
    }
}
