//! Move definitions, player/AI action choices and the per-round queue.

mod definition;
mod queue;
mod targeting;

pub use definition::{
    Accuracy, AiHint, EffectTarget, Impact, MoveDef, MoveEffect, MoveTags, TargetKind,
};
pub use queue::{ActionChoice, QueuedAction, SWITCH_PRIORITY, sort_queue};
pub use targeting::{default_target, legal_targets, resolve_targets};
