use super::combatant::{Combatant, CombatantId, CombatantRecord, Side};

/// Mutable battle state owned by the engine.
///
/// Combatants are stored in roster order, which is also the order AI picks are
/// queued in and the order lifecycle hooks fire.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub combatants: Vec<Combatant>,
    /// Current round, starting at 1.
    pub round: u32,
}

impl BattleState {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        Self {
            combatants,
            round: 1,
        }
    }

    pub fn view(&self) -> BattleView<'_> {
        BattleView {
            combatants: &self.combatants,
            round: self.round,
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    /// Combatant occupying `slot` on `side`, alive or not.
    pub fn at_slot(&self, side: Side, slot: u8) -> Option<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.side == side && c.slot == Some(slot))
    }

    /// True when at least one combatant of `side` is alive, benched or not.
    pub fn side_has_living(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .any(|c| c.side == side && c.is_alive())
    }

    /// First living benched combatant of `side`, in roster order.
    pub fn first_reserve(&self, side: Side) -> Option<CombatantId> {
        self.combatants
            .iter()
            .find(|c| c.side == side && c.is_alive() && !c.is_on_field())
            .map(|c| c.id)
    }

    /// Snapshot of every combatant with definitions reduced to ids.
    pub fn records(&self) -> Vec<CombatantRecord> {
        self.combatants.iter().map(CombatantRecord::from).collect()
    }

    /// SHA-256 over the serialized round and combatant records.
    ///
    /// Two battles with equal digests have identical observable state.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], DigestError> {
        use sha2::{Digest, Sha256};

        let encoded = bincode::serialize(&(self.round, self.records()))?;
        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        Ok(hasher.finalize().into())
    }
}

/// The battle state could not be encoded for hashing.
#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
#[error("failed to encode battle state for digest: {0}")]
pub struct DigestError(#[from] bincode::Error);

#[cfg(feature = "serde")]
impl crate::error::CombatError for DigestError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        "STATE_DIGEST_ENCODE"
    }
}

/// Read-only view of the battle handed to ability hooks and the AI.
#[derive(Clone, Copy, Debug)]
pub struct BattleView<'a> {
    combatants: &'a [Combatant],
    round: u32,
}

impl<'a> BattleView<'a> {
    pub fn new(combatants: &'a [Combatant], round: u32) -> Self {
        Self { combatants, round }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn combatants(&self) -> &'a [Combatant] {
        self.combatants
    }

    pub fn get(&self, id: CombatantId) -> Option<&'a Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    /// Living on-field combatants of `side`, in roster order.
    pub fn active(&self, side: Side) -> impl Iterator<Item = &'a Combatant> + use<'a> {
        self.combatants
            .iter()
            .filter(move |c| c.side == side && c.is_active())
    }

    /// Living on-field opponents of `owner`.
    pub fn enemies_of(&self, owner: &Combatant) -> impl Iterator<Item = &'a Combatant> + use<'a> {
        self.active(owner.side.opponent())
    }

    /// Living on-field teammates of `owner`, including `owner` itself.
    pub fn allies_of(&self, owner: &Combatant) -> impl Iterator<Item = &'a Combatant> + use<'a> {
        self.active(owner.side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CombatantStats;

    fn roster() -> Vec<Combatant> {
        vec![
            Combatant::new(CombatantId(1), "a", Side::Player).at_slot(0),
            Combatant::new(CombatantId(2), "b", Side::Player),
            Combatant::new(CombatantId(3), "c", Side::Enemy)
                .at_slot(0)
                .with_stats(CombatantStats::new(1, 10, 0).with_current_hp(0)),
        ]
    }

    #[test]
    fn view_filters_active_combatants() {
        let state = BattleState::new(roster());
        let view = state.view();
        assert_eq!(view.active(Side::Player).count(), 1);
        assert_eq!(view.active(Side::Enemy).count(), 0);
        assert_eq!(state.first_reserve(Side::Player), Some(CombatantId(2)));
        assert!(!state.side_has_living(Side::Enemy));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_tracks_state_changes() {
        let mut state = BattleState::new(roster());
        let before = state.digest().expect("roster encodes");
        assert_eq!(before, state.clone().digest().expect("clone encodes"));
        if let Some(c) = state.get_mut(CombatantId(1)) {
            c.stats.apply_damage(1);
        }
        assert_ne!(before, state.digest().expect("damaged roster encodes"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn digest_error_is_fatal_and_coded() {
        use crate::error::{CombatError, ErrorSeverity};

        let cause = bincode::Error::new(bincode::ErrorKind::SizeLimit);
        let err = DigestError::from(cause);
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), "STATE_DIGEST_ENCODE");
        assert!(err.to_string().starts_with("failed to encode battle state for digest"));
    }
}
