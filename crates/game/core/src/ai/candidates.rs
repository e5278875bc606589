use std::sync::Arc;

use crate::action::{MoveDef, legal_targets};
use crate::state::{BattleView, Combatant, CombatantId, StatusKind};

/// One (move, target) pair the AI may pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub move_index: usize,
    /// Chosen target for single-target moves, `None` otherwise.
    pub target: Option<CombatantId>,
    pub score: i32,
}

/// Moves the actor can pay for and is allowed to use.
pub fn usable_moves(actor: &Combatant) -> impl Iterator<Item = (usize, &Arc<MoveDef>)> + '_ {
    let silenced = actor.statuses.has(StatusKind::Silenced);
    actor
        .moves
        .iter()
        .enumerate()
        .filter(move |(_, mv)| {
            actor.stats.has_mana(mv.mana_cost) && !(silenced && mv.mana_cost > 0)
        })
}

/// Every legal (move, target) pair, unscored.
pub fn enumerate(view: &BattleView<'_>, actor: &Combatant) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (move_index, mv) in usable_moves(actor) {
        if mv.target.is_single() {
            for target in legal_targets(view, actor, mv) {
                out.push(Candidate {
                    move_index,
                    target: Some(target),
                    score: 0,
                });
            }
        } else {
            out.push(Candidate {
                move_index,
                target: None,
                score: 0,
            });
        }
    }
    out
}
