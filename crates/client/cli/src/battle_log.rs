//! Renders battle notifications as log lines.
use std::collections::HashMap;

use combat_core::action::ActionChoice;
use combat_core::events::BattleEvent;
use combat_core::state::{Combatant, CombatantId};
use combat_runtime::Event;

/// Formats events with combatant names instead of raw ids.
pub struct BattleLog {
    names: HashMap<CombatantId, String>,
}

impl BattleLog {
    pub fn new<'a>(combatants: impl IntoIterator<Item = &'a Combatant>) -> Self {
        Self {
            names: combatants
                .into_iter()
                .map(|c| (c.id, c.name.clone()))
                .collect(),
        }
    }

    fn name(&self, id: CombatantId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// One line per event, `None` for events not worth printing.
    pub fn line(&self, event: &Event) -> Option<String> {
        let text = match &event.event {
            BattleEvent::BattleStarted => "The battle begins!".to_string(),
            BattleEvent::TurnStarted { round } => format!("--- Round {round} ---"),
            BattleEvent::TurnEnded { .. } => return None,
            BattleEvent::ActionDeclared { actor, choice } => match choice {
                ActionChoice::Stall => format!("{} hesitates", self.name(*actor)),
                _ => return None,
            },
            BattleEvent::ActionExecuted {
                actor,
                move_id,
                results,
            } => {
                let mut text = format!("{} uses {move_id}", self.name(*actor));
                for hit in results {
                    let target = self.name(hit.target);
                    let note = if hit.result.is_immune() {
                        " (immune)"
                    } else if hit.result.critical {
                        " (critical)"
                    } else if hit.result.graze {
                        " (graze)"
                    } else {
                        ""
                    };
                    if hit.blocked {
                        text.push_str(&format!("; {target} is protected"));
                    } else {
                        text.push_str(&format!("; {target} takes {}{note}", hit.result.damage));
                    }
                }
                text
            }
            BattleEvent::Healed { target, amount } => {
                format!("{} recovers {amount} HP", self.name(*target))
            }
            BattleEvent::Damaged { target, amount } => {
                format!("{} takes {amount} damage", self.name(*target))
            }
            BattleEvent::Recoiled { actor, amount } => {
                format!("{} is hurt by recoil ({amount})", self.name(*actor))
            }
            BattleEvent::Defeated { target } => format!("{} is defeated!", self.name(*target)),
            BattleEvent::SwitchedIn {
                incoming, slot, ..
            } => format!("{} takes the field in slot {slot}", self.name(*incoming)),
            BattleEvent::StatusApplied { target, kind, .. } => {
                format!("{} is now {kind}", self.name(*target))
            }
            BattleEvent::StatusBlocked { target, kind } => {
                format!("{} resists {kind}", self.name(*target))
            }
            BattleEvent::StatusRemoved { target, kind } => {
                format!("{} is no longer {kind}", self.name(*target))
            }
            BattleEvent::StatusTriggered {
                target,
                kind,
                amount,
            } => format!("{} is affected by {kind} ({amount})", self.name(*target)),
            BattleEvent::StatStageChanged {
                target,
                stat,
                delta,
                stage,
            } => format!(
                "{}'s {stat} {} ({stage:+})",
                self.name(*target),
                if *delta > 0 { "rises" } else { "falls" }
            ),
            BattleEvent::AbilityActivated { owner, ability } => {
                format!("[{}'s {ability}]", self.name(*owner))
            }
            BattleEvent::MoveFailed { actor, reason } => {
                format!("{}'s move fails: {reason}", self.name(*actor))
            }
            BattleEvent::ActionSkipped { actor, reason } => {
                format!("{} cannot act: {reason}", self.name(*actor))
            }
            BattleEvent::BattleOver { outcome } => format!("Battle over: {outcome}"),
        };
        Some(text)
    }
}
