//! Damage resolution.
//!
//! - [`resolve_damage`]: the ordered pipeline from move to final damage
//! - [`Roller`]: live or simulated random decisions
//! - [`DamageResult`]: damage, critical and graze flags

pub mod damage;
pub mod result;
pub mod roll;

pub use damage::{DamageContext, resolve_damage};
pub use result::DamageResult;
pub use roll::{Roller, VarianceMode};
