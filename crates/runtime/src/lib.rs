//! Host-side orchestration for the deterministic combat engine.
//!
//! The engine in `combat-core` is a pure step function. This crate wraps it
//! in a [`BattleSession`] that hosts tick from their own loop:
//! - [`runtime`] hosts the session and its configuration
//! - [`api`] exposes the provider trait and error types clients interact with
//! - [`events`] provides a topic-based event bus for battle notifications
//! - [`providers`] holds the AI-driven autopilot provider
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;

pub use api::{
    ActionProvider, ActionRequest, Result, RuntimeError, ScriptedActionProvider,
    StallActionProvider,
};
pub use events::{Event, EventBus, Topic};
pub use providers::AutopilotProvider;
pub use runtime::{BattleSession, RuntimeConfig};
