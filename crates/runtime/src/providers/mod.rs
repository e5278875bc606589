//! Action provider implementations beyond the basic fixtures in [`crate::api`].

pub mod autopilot;

pub use autopilot::AutopilotProvider;
