//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use combat_core::events::BattleEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle and turn boundaries, outcome
    Flow,
    /// Declared, executed, failed and skipped actions, switches
    Action,
    /// HP, status, stage and ability changes
    Effect,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Flow, Topic::Action, Topic::Effect];
}

/// A published battle notification.
///
/// `seq` is the session-wide publication order; it lets consumers of several
/// topics restore the engine's emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub seq: u64,
    pub round: u32,
    pub event: BattleEvent,
}

impl Event {
    pub fn new(seq: u64, round: u32, event: BattleEvent) -> Self {
        Self { seq, round, event }
    }

    pub fn topic(&self) -> Topic {
        match &self.event {
            BattleEvent::BattleStarted
            | BattleEvent::TurnStarted { .. }
            | BattleEvent::TurnEnded { .. }
            | BattleEvent::BattleOver { .. } => Topic::Flow,
            BattleEvent::ActionDeclared { .. }
            | BattleEvent::ActionExecuted { .. }
            | BattleEvent::MoveFailed { .. }
            | BattleEvent::ActionSkipped { .. }
            | BattleEvent::SwitchedIn { .. } => Topic::Action,
            BattleEvent::Healed { .. }
            | BattleEvent::Damaged { .. }
            | BattleEvent::Recoiled { .. }
            | BattleEvent::Defeated { .. }
            | BattleEvent::StatusApplied { .. }
            | BattleEvent::StatusBlocked { .. }
            | BattleEvent::StatusRemoved { .. }
            | BattleEvent::StatusTriggered { .. }
            | BattleEvent::StatStageChanged { .. }
            | BattleEvent::AbilityActivated { .. } => Topic::Effect,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; a topic without
/// subscribers drops its events.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        let Some(tx) = self.channels.get(&topic) else {
            return;
        };
        if tx.send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic, or
    /// `None` for a topic this bus does not carry.
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        self.channels.get(&topic).map(broadcast::Sender::subscribe)
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .filter_map(|&topic| self.subscribe(topic).map(|rx| (topic, rx)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use combat_core::state::CombatantId;

    use super::*;

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut flow = bus.subscribe(Topic::Flow).expect("flow topic");
        let mut effects = bus.subscribe(Topic::Effect).expect("effect topic");

        bus.publish(Event::new(0, 1, BattleEvent::TurnStarted { round: 1 }));
        bus.publish(Event::new(
            1,
            1,
            BattleEvent::Defeated {
                target: CombatantId(2),
            },
        ));

        assert_eq!(
            flow.try_recv().map(|e| e.event),
            Ok(BattleEvent::TurnStarted { round: 1 })
        );
        assert!(flow.try_recv().is_err());
        assert_eq!(effects.try_recv().map(|e| e.topic()), Ok(Topic::Effect));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(Event::new(0, 1, BattleEvent::BattleStarted));
        let mut late = bus.subscribe(Topic::Flow).expect("flow topic");
        assert!(late.try_recv().is_err());
    }
}
