/// Battle phase state machine.
///
/// ```text
/// BattleStart → StartOfTurn → ActionSelection → ActionResolution → EndOfTurn
///                    ↑                                                 │
///                    └─────────────────────────────────────────────────┤
///                                                                      ↓
///                                                                 BattleOver
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    /// Initial phase; fires battle-start hooks once.
    BattleStart,
    StartOfTurn,
    /// Waits until every active player-controlled combatant has an action.
    ActionSelection,
    /// Resolves one queued action per step.
    ActionResolution,
    EndOfTurn,
    /// Terminal.
    BattleOver(BattleOutcome),
}

impl BattlePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, BattlePhase::BattleOver(_))
    }
}

/// Result of a finished battle, from the player's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Draw,
}
