//! Authoritative battle state.
//!
//! The engine owns a [`BattleState`] and mutates it exclusively through its
//! phase handlers. Hooks and the AI only ever see a [`BattleView`].

mod battle;
mod combatant;
mod status;

#[cfg(feature = "serde")]
pub use battle::DigestError;
pub use battle::{BattleState, BattleView};
pub use combatant::{CombatTags, Combatant, CombatantId, CombatantRecord, Side};
pub use status::{ApplyOutcome, StatusEffect, StatusEffects, StatusKind};
