//! Read-only battle environment: static catalogs and the injected RNG.
//!
//! Catalogs are produced once by a content loader and shared by reference for
//! the lifetime of a battle. They never appear in [`crate::state::BattleState`];
//! combatants hold `Arc` handles to the definitions they use.

mod catalog;
mod elements;
mod rng;

pub use catalog::{AbilityCatalog, Catalog, Catalogs, Keyed, MoveCatalog, normalize_key};
pub use elements::{ElementId, ElementMatrix};
pub use rng::{BattleRng, PcgRng, ScriptedRng};
