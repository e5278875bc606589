//! Stat model: base attributes, stages, and derivation of effective values.
//!
//! ```text
//! [ Base attributes ]      CombatantStats (stored)
//!      ↓
//! [ Ability bonuses ]      "did stat calc" dispatch, BonusStack order
//!      ↓
//! [ Stage multiplier ]     13-entry table, [-6, 6]
//!      ↓
//! [ Status multiplier ]    Weakened / Slowed
//!      ↓
//! round() → effective value
//! ```
//!
//! Only the first layer is stored. Everything below it is recomputed on
//! demand and has no side effects.

pub mod bonus;
pub mod core;
pub mod effective;
pub mod stage;

pub use bonus::{Bonus, BonusStack};
pub use self::core::{CombatantStats, Stat};
pub use effective::{effective_accuracy, effective_stat, status_multiplier};
pub use stage::{MAX_STAGE, MIN_STAGE, STAGE_MULTIPLIERS, StatStages, stage_multiplier};
