//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{EventSink, LifecycleEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Sequencer playback (animation start/complete)
    Animation,
    /// Battle flow (start, turns, resolutions, end)
    Battle,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front, one per topic.
#[derive(Clone)]
pub struct EventBus {
    animation: broadcast::Sender<LifecycleEvent>,
    battle: broadcast::Sender<LifecycleEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            animation: broadcast::channel(capacity).0,
            battle: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<LifecycleEvent> {
        match topic {
            Topic::Animation => &self.animation,
            Topic::Battle => &self.battle,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: LifecycleEvent) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<LifecycleEvent> {
        self.channel(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> Vec<(Topic, broadcast::Receiver<LifecycleEvent>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: LifecycleEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use battle_core::Side;

    use super::*;

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut battle = bus.subscribe(Topic::Battle);
        let mut animation = bus.subscribe(Topic::Animation);

        bus.publish(LifecycleEvent::TurnStart {
            side: Side::Enemy,
            turn: 2,
        });

        assert_eq!(
            battle.try_recv().unwrap(),
            LifecycleEvent::TurnStart {
                side: Side::Enemy,
                turn: 2
            }
        );
        assert!(animation.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        EventBus::new().publish(LifecycleEvent::BattleAborted { turn: 3 });
    }
}
