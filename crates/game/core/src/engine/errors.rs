//! Error types for battle setup and player input.

use crate::error::{CombatError, ErrorSeverity};
use crate::state::{CombatantId, Side};

use super::phase::BattlePhase;

/// The battle cannot start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{side} roster is empty")]
    EmptyRoster { side: Side },

    #[error("no living player-controlled combatant")]
    NoLivingPlayer,

    #[error("too many combatants: {count} (max {max})")]
    TooManyCombatants { count: usize, max: usize },

    #[error("combatant id {id} appears more than once")]
    DuplicateCombatant { id: CombatantId },

    #[error("combatant {id} placed in slot {slot}, but only {max} slots exist")]
    SlotOutOfRange { id: CombatantId, slot: u8, max: u8 },

    #[error("{side} slot {slot} is occupied twice")]
    SlotOccupied { side: Side, slot: u8 },
}

impl CombatError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster { .. } => "SETUP_EMPTY_ROSTER",
            Self::NoLivingPlayer => "SETUP_NO_LIVING_PLAYER",
            Self::TooManyCombatants { .. } => "SETUP_TOO_MANY_COMBATANTS",
            Self::DuplicateCombatant { .. } => "SETUP_DUPLICATE_COMBATANT",
            Self::SlotOutOfRange { .. } => "SETUP_SLOT_OUT_OF_RANGE",
            Self::SlotOccupied { .. } => "SETUP_SLOT_OCCUPIED",
        }
    }
}

/// A submitted player action was ignored.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("not accepting actions during {phase}")]
    NotSelecting { phase: BattlePhase },

    #[error("no combatant in player slot {slot}")]
    EmptySlot { slot: u8 },

    #[error("combatant {id} is defeated")]
    Defeated { id: CombatantId },

    #[error("combatant {id} is not player-controlled")]
    NotPlayerControlled { id: CombatantId },

    #[error("combatant {id} already has an action this round")]
    AlreadySubmitted { id: CombatantId },

    #[error("combatant {id} has no move at index {index}")]
    UnknownMove { id: CombatantId, index: usize },

    #[error("combatant {id} cannot switch to {to}")]
    InvalidSwitch { id: CombatantId, to: CombatantId },
}

impl CombatError for SubmitError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Ignored
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotSelecting { .. } => "SUBMIT_NOT_SELECTING",
            Self::EmptySlot { .. } => "SUBMIT_EMPTY_SLOT",
            Self::Defeated { .. } => "SUBMIT_DEFEATED",
            Self::NotPlayerControlled { .. } => "SUBMIT_NOT_PLAYER_CONTROLLED",
            Self::AlreadySubmitted { .. } => "SUBMIT_ALREADY_SUBMITTED",
            Self::UnknownMove { .. } => "SUBMIT_UNKNOWN_MOVE",
            Self::InvalidSwitch { .. } => "SUBMIT_INVALID_SWITCH",
        }
    }
}
