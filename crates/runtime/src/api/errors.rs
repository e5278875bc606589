//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine setup failures and action provider problems so hosts can
//! bubble them up with consistent context.
use thiserror::Error;

use combat_core::engine::SetupError;
use combat_core::error::{CombatError, ErrorSeverity};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("action provider has no more actions for slot {slot}")]
    ProviderExhausted { slot: u8 },

    #[error("action provider failed for slot {slot}: {reason}")]
    Provider { slot: u8, reason: String },

    #[error("battle still running after {ticks} ticks")]
    TickLimit { ticks: u64 },
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(err) => err.severity(),
            Self::ProviderExhausted { .. } | Self::Provider { .. } => ErrorSeverity::Ignored,
            Self::TickLimit { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(err) => err.error_code(),
            Self::ProviderExhausted { .. } => "RUNTIME_PROVIDER_EXHAUSTED",
            Self::Provider { .. } => "RUNTIME_PROVIDER_FAILED",
            Self::TickLimit { .. } => "RUNTIME_TICK_LIMIT",
        }
    }
}
