//! Deterministic turn-based combat rules shared across hosts.
//!
//! `combat-core` defines the canonical battle model (combatants, moves,
//! abilities, statuses) and the phase state machine that resolves it. It does
//! no I/O: content arrives as already-validated definitions and randomness is
//! injected through [`env::BattleRng`]. All state mutation flows through
//! [`engine::BattleEngine`]; supporting crates depend on the types re-exported
//! here.
pub mod abilities;
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;
pub mod stats;

pub use abilities::{AbilityDef, AbilityInstance, AbilityKind, AbilityState};
pub use action::{
    Accuracy, ActionChoice, AiHint, EffectTarget, Impact, MoveDef, MoveEffect, MoveTags,
    QueuedAction, TargetKind,
};
pub use ai::AiConfig;
pub use combat::{DamageContext, DamageResult, Roller, VarianceMode, resolve_damage};
pub use config::{BattleConfig, CombatRules};
pub use engine::{BattleEngine, BattleOutcome, BattlePhase, SetupError, SubmitError};
pub use env::{
    AbilityCatalog, BattleRng, Catalogs, ElementId, ElementMatrix, MoveCatalog, PcgRng,
    ScriptedRng,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{BattleEvent, FailReason, SkipReason, TargetResult};
pub use state::{
    BattleState, BattleView, CombatTags, Combatant, CombatantId, Side, StatusEffects, StatusKind,
};
pub use stats::{CombatantStats, Stat};
