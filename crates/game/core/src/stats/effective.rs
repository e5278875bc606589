//! Pure derivation of effective attribute and accuracy values.

use crate::abilities::dispatch;
use crate::action::{Accuracy, MoveDef};
use crate::config::CombatRules;
use crate::state::{BattleView, Combatant, StatusEffects, StatusKind};

use super::core::Stat;

/// Product of every active status multiplier that touches `stat`.
pub fn status_multiplier(statuses: &StatusEffects, stat: Stat, rules: &CombatRules) -> f64 {
    let mut multiplier = 1.0;
    if statuses.has(StatusKind::Weakened) && matches!(stat, Stat::Strength | Stat::Intelligence) {
        multiplier *= rules.weakened_multiplier;
    }
    if statuses.has(StatusKind::Slowed) && stat == Stat::Agility {
        multiplier *= rules.slowed_multiplier;
    }
    multiplier
}

/// `round(ability_modified_base * stage_multiplier * status_multiplier)`.
pub fn effective_stat(
    view: &BattleView<'_>,
    combatant: &Combatant,
    stat: Stat,
    rules: &CombatRules,
) -> i32 {
    let base = dispatch::stat_calc(view, combatant, stat);
    let value = base as f64
        * combatant.stages.multiplier(stat)
        * status_multiplier(&combatant.statuses, stat, rules);
    value.round() as i32
}

/// Accuracy of `mv` when used by `attacker`, or `None` for moves that never miss.
///
/// Blindness scales the base first, then accuracy-modifier abilities add their
/// percent increases.
pub fn effective_accuracy(attacker: &Combatant, mv: &MoveDef, rules: &CombatRules) -> Option<u32> {
    let Accuracy::Percent(base) = mv.accuracy else {
        return None;
    };
    let mut accuracy = base as f64;
    if attacker.statuses.has(StatusKind::Blinded) {
        accuracy = (accuracy * rules.blind_accuracy_multiplier).round();
    }
    let increase = dispatch::accuracy_bonus(attacker, mv);
    if increase != 0 {
        accuracy = (accuracy * (100 + increase).max(0) as f64 / 100.0).round();
    }
    Some(accuracy.max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::abilities::{AbilityDef, AbilityKind};
    use crate::state::{BattleState, CombatantId, Side};
    use crate::stats::CombatantStats;

    fn fighter(id: u16, side: Side) -> Combatant {
        Combatant::new(CombatantId(id), format!("c{id}"), side)
            .at_slot(0)
            .with_stats(CombatantStats::new(10, 100, 10).with_attributes(10, 10, 10, 10))
    }

    #[test]
    fn stat_modifier_adds_flat_bonus() {
        let ability = Arc::new(AbilityDef::new(
            "brawn",
            AbilityKind::StatModifier {
                modifiers: vec![(Stat::Strength, 10)],
            },
        ));
        let state = BattleState::new(vec![
            fighter(1, Side::Player).with_ability(ability),
            fighter(2, Side::Enemy),
        ]);
        let view = state.view();
        let rules = CombatRules::default();
        let owner = &state.combatants[0];
        assert_eq!(effective_stat(&view, owner, Stat::Strength, &rules), 20);
        assert_eq!(effective_stat(&view, owner, Stat::Agility, &rules), 10);
    }

    #[test]
    fn cornered_triggers_only_at_low_hp() {
        let ability = Arc::new(AbilityDef::new(
            "cornered",
            AbilityKind::Cornered {
                stat: Stat::Agility,
                hp_threshold_pct: 33,
                enemy_count_threshold: 99,
                bonus_pct: 50,
            },
        ));
        let rules = CombatRules::default();

        let mut low = fighter(1, Side::Player).with_ability(ability.clone());
        low.stats.set_current_hp(10);
        let state = BattleState::new(vec![low, fighter(2, Side::Enemy)]);
        let view = state.view();
        assert_eq!(effective_stat(&view, &state.combatants[0], Stat::Agility, &rules), 15);

        let full = fighter(1, Side::Player).with_ability(ability);
        let state = BattleState::new(vec![full, fighter(2, Side::Enemy)]);
        let view = state.view();
        assert_eq!(effective_stat(&view, &state.combatants[0], Stat::Agility, &rules), 10);
    }

    #[test]
    fn stages_and_statuses_multiply() {
        let rules = CombatRules::default();
        let mut c = fighter(1, Side::Player);
        c.stages.shift(Stat::Strength, 2);
        c.statuses.apply(StatusKind::Weakened, 3);
        let state = BattleState::new(vec![c, fighter(2, Side::Enemy)]);
        let view = state.view();
        // 10 * 2.0 * 0.75
        assert_eq!(effective_stat(&view, &state.combatants[0], Stat::Strength, &rules), 15);
    }

    #[test]
    fn slowed_halves_agility_only() {
        let rules = CombatRules::default();
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusKind::Slowed, 2);
        assert_eq!(status_multiplier(&statuses, Stat::Agility, &rules), 0.5);
        assert_eq!(status_multiplier(&statuses, Stat::Strength, &rules), 1.0);
    }

    #[test]
    fn blinded_accuracy_is_scaled_and_rounded() {
        let rules = CombatRules::default();
        let mv = MoveDef::new("jab", "Jab").with_power(40).with_accuracy(Accuracy::Percent(95));
        let mut c = fighter(1, Side::Player);
        assert_eq!(effective_accuracy(&c, &mv, &rules), Some(95));
        c.statuses.apply(StatusKind::Blinded, 2);
        assert_eq!(effective_accuracy(&c, &mv, &rules), Some(57));

        let sure = MoveDef::new("sure", "Sure Hit").with_power(40);
        assert_eq!(effective_accuracy(&c, &sure, &rules), None);
    }
}
