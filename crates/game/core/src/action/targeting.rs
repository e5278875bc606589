//! Target legality and resolution.

use crate::state::{BattleView, Combatant, CombatantId};

use super::definition::{MoveDef, TargetKind};

/// Every combatant `actor` may pick as the single target of `mv`.
///
/// Multi-target and self moves return an empty list: there is nothing to pick.
pub fn legal_targets(view: &BattleView<'_>, actor: &Combatant, mv: &MoveDef) -> Vec<CombatantId> {
    match mv.target {
        TargetKind::SingleEnemy => view.enemies_of(actor).map(|c| c.id).collect(),
        TargetKind::SingleAlly => view.allies_of(actor).map(|c| c.id).collect(),
        TargetKind::AnyOther => view
            .combatants()
            .iter()
            .filter(|c| c.is_active() && c.id != actor.id)
            .map(|c| c.id)
            .collect(),
        TargetKind::AllEnemies | TargetKind::AllAllies | TargetKind::User => Vec::new(),
    }
}

/// Resolves the combatants `mv` actually affects at execution time.
///
/// A single enemy target that left the field or fell is replaced by the first
/// living opponent. Other single-target kinds fall back to their default.
pub fn resolve_targets(
    view: &BattleView<'_>,
    actor: &Combatant,
    mv: &MoveDef,
    chosen: Option<CombatantId>,
) -> Vec<CombatantId> {
    match mv.target {
        TargetKind::User => vec![actor.id],
        TargetKind::AllEnemies => view.enemies_of(actor).map(|c| c.id).collect(),
        TargetKind::AllAllies => view.allies_of(actor).map(|c| c.id).collect(),
        TargetKind::SingleEnemy | TargetKind::SingleAlly | TargetKind::AnyOther => {
            let legal = legal_targets(view, actor, mv);
            match chosen {
                Some(id) if legal.contains(&id) => vec![id],
                _ => default_target(view, actor, mv).into_iter().collect(),
            }
        }
    }
}

/// Target used when none was chosen or the chosen one is gone.
pub fn default_target(
    view: &BattleView<'_>,
    actor: &Combatant,
    mv: &MoveDef,
) -> Option<CombatantId> {
    match mv.target {
        TargetKind::SingleEnemy | TargetKind::AnyOther => view.enemies_of(actor).next().map(|c| c.id),
        TargetKind::SingleAlly => Some(actor.id),
        _ => None,
    }
}
