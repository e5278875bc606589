//! Data-driven combat content and loaders.
//!
//! This crate houses the default combat content and provides loaders for
//! RON/TOML data files:
//! - Ability catalog (RON, one typed kind per entry)
//! - Move catalog (RON, referencing abilities by id)
//! - Element interaction matrix (RON)
//! - Combat rule overrides (TOML)
//!
//! Content is validated into `combat-core` definitions and handed to the
//! engine as read-only [`combat_core::env::Catalogs`]. It never appears in
//! battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ContentFactory, Diagnostic, Diagnostics, ElementLoader, LoadResult,
    LoadedContent, MoveLoader, RulesLoader,
};
