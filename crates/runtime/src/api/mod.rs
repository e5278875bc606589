//! Types downstream hosts interact with.

pub mod errors;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{ActionProvider, ActionRequest, ScriptedActionProvider, StallActionProvider};
