//! Status effects carried by combatants.
//!
//! # Turn-based Duration
//!
//! Applying an effect for `d` turns stores `d + 1` remaining. Every
//! StartOfTurn decrements each timed effect once, so the effect stays active
//! through `d` complete turns after the one it was applied in. Permanent kinds
//! ignore the countdown and leave only when cleansed.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Damage over time (permanent)
    // ========================================================================
    /// Escalating damage at end of turn.
    Poisoned,

    /// Flat damage at end of turn; extra damage from physical hits.
    Burned,

    // ========================================================================
    // Crowd control / debuffs
    // ========================================================================
    /// Takes double physical damage.
    Frozen,

    /// Cannot act.
    Stunned,

    /// Cannot use moves that cost mana.
    Silenced,

    /// Accuracy reduced.
    Blinded,

    /// Strength and intelligence reduced.
    Weakened,

    /// Agility reduced.
    Slowed,

    /// Critical hits against this combatant are twice as likely.
    Exposed,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// Non-true-hit moves graze automatically.
    Evasive,

    /// Physical damage increased on non-critical hits.
    Empowered,

    /// Magical damage increased on non-critical hits.
    Focused,

    /// Incoming non-critical damage reduced.
    Fortified,

    /// Restores HP at end of turn.
    Regenerating,
}

impl StatusKind {
    /// Permanent kinds never expire from the turn countdown.
    pub const fn is_permanent(self) -> bool {
        matches!(self, StatusKind::Poisoned | StatusKind::Burned)
    }

    /// Returns true for effects that hinder their bearer.
    pub const fn is_negative(self) -> bool {
        !matches!(
            self,
            StatusKind::Evasive
                | StatusKind::Empowered
                | StatusKind::Focused
                | StatusKind::Fortified
                | StatusKind::Regenerating
        )
    }
}

/// A single active status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Turns remaining. Removed when it reaches 0.
    pub remaining: i32,
    /// Per-instance counter, used by poison escalation.
    pub counter: u8,
}

/// Result of applying a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new effect was added.
    Added,
    /// An existing effect had its duration reset.
    Refreshed,
    /// The container is full; nothing changed.
    Full,
}

/// Active status effects on a combatant, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn get_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.kind == kind)
    }

    /// Applies `kind` for `duration` turns (stored as `duration + 1`).
    ///
    /// Re-applying an active kind resets its duration; effects never stack.
    pub fn apply(&mut self, kind: StatusKind, duration: u8) -> ApplyOutcome {
        let remaining = duration as i32 + 1;
        if let Some(existing) = self.get_mut(kind) {
            existing.remaining = remaining;
            return ApplyOutcome::Refreshed;
        }

        if self.effects.is_full() {
            return ApplyOutcome::Full;
        }

        self.effects.push(StatusEffect {
            kind,
            remaining,
            counter: 0,
        });
        ApplyOutcome::Added
    }

    /// Removes a status effect. Returns true if it was present.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Removes every negative effect, returning the removed kinds in order.
    pub fn cleanse(&mut self) -> Vec<StatusKind> {
        let removed: Vec<_> = self
            .effects
            .iter()
            .filter(|e| e.kind.is_negative())
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !e.kind.is_negative());
        removed
    }

    /// Decrements every timed effect once and drops the ones at or below 0.
    ///
    /// Returns the expired kinds in application order.
    pub fn tick(&mut self) -> Vec<StatusKind> {
        for effect in self.effects.iter_mut() {
            if !effect.kind.is_permanent() {
                effect.remaining -= 1;
            }
        }
        let expired: Vec<_> = self
            .effects
            .iter()
            .filter(|e| !e.kind.is_permanent() && e.remaining <= 0)
            .map(|e| e.kind)
            .collect();
        self.effects
            .retain(|e| e.kind.is_permanent() || e.remaining > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_stores_duration_plus_one() {
        let mut statuses = StatusEffects::new();
        assert_eq!(statuses.apply(StatusKind::Stunned, 2), ApplyOutcome::Added);
        assert_eq!(statuses.get(StatusKind::Stunned).map(|e| e.remaining), Some(3));
    }

    #[test]
    fn reapply_resets_without_stacking() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusKind::Slowed, 3);
        statuses.tick();
        statuses.tick();
        assert_eq!(statuses.get(StatusKind::Slowed).map(|e| e.remaining), Some(2));

        assert_eq!(statuses.apply(StatusKind::Slowed, 3), ApplyOutcome::Refreshed);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.get(StatusKind::Slowed).map(|e| e.remaining), Some(4));
    }

    #[test]
    fn tick_expires_timed_effects_only() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusKind::Blinded, 1);
        statuses.apply(StatusKind::Poisoned, 1);
        assert!(statuses.tick().is_empty());
        assert_eq!(statuses.tick(), vec![StatusKind::Blinded]);
        assert!(statuses.has(StatusKind::Poisoned));
        for _ in 0..10 {
            statuses.tick();
        }
        assert!(statuses.has(StatusKind::Poisoned));
    }

    #[test]
    fn cleanse_keeps_buffs() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusKind::Burned, 1);
        statuses.apply(StatusKind::Fortified, 2);
        statuses.apply(StatusKind::Weakened, 2);
        assert_eq!(statuses.cleanse(), vec![StatusKind::Burned, StatusKind::Weakened]);
        assert!(statuses.has(StatusKind::Fortified));
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn full_container_rejects_new_kinds() {
        let mut statuses = StatusEffects::new();
        let kinds = [
            StatusKind::Poisoned,
            StatusKind::Burned,
            StatusKind::Frozen,
            StatusKind::Stunned,
            StatusKind::Silenced,
            StatusKind::Blinded,
            StatusKind::Weakened,
            StatusKind::Slowed,
        ];
        for kind in kinds {
            assert_eq!(statuses.apply(kind, 1), ApplyOutcome::Added);
        }
        assert_eq!(statuses.apply(StatusKind::Exposed, 1), ApplyOutcome::Full);
        assert_eq!(statuses.apply(StatusKind::Frozen, 4), ApplyOutcome::Refreshed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialization_preserves_kind_duration_counter() {
        let mut statuses = StatusEffects::new();
        statuses.apply(StatusKind::Poisoned, 0);
        statuses.apply(StatusKind::Empowered, 3);
        if let Some(poison) = statuses.get_mut(StatusKind::Poisoned) {
            poison.counter = 2;
        }

        let bytes = bincode::serialize(&statuses).expect("serialize");
        let decoded: StatusEffects = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(decoded, statuses);
        let poison = decoded.get(StatusKind::Poisoned).expect("poison survives");
        assert_eq!(poison.remaining, 1);
        assert_eq!(poison.counter, 2);
    }
}
