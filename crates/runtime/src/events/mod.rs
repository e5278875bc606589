//! Battle event fan-out for hosts.

mod bus;

pub use bus::{Event, EventBus, Topic};
