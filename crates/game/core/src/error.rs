//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (e.g. [`crate::engine::SetupError`]) live next to the
//! operations that produce them. This module holds the classification shared by
//! all of them.
//!
//! The engine distinguishes three tiers:
//!
//! - **Content**: malformed data definitions, skipped at load time
//! - **Ignored**: inconsistent runtime input, dropped without affecting the battle
//! - **Fatal**: setup failures reported before the state machine starts
//!
//! Ordinary combat outcomes (a graze, a blocked status) are result flags, never
//! errors.

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid content entry; the entry is skipped and loading continues.
    Content,

    /// Runtime input that does not fit the current battle state.
    ///
    /// Examples: action for a defeated combatant, duplicate submission.
    Ignored,

    /// The battle cannot start.
    ///
    /// Examples: empty roster, no living player-controlled combatant.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Ignored => "ignored",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if the battle can continue after this error.
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on whether the battle can proceed
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
