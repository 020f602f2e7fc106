//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{InputEvent, PlaybackEvent, RoundEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Round start and end
    Round,
    /// Collecting-phase input handling
    Input,
    /// Tick dispatch and completion
    Playback,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Round, Topic::Input, Topic::Playback];

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Round(RoundEvent),
    Input(InputEvent),
    Playback(PlaybackEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Round(_) => Topic::Round,
            Event::Input(_) => Topic::Input,
            Event::Playback(_) => Topic::Playback,
        }
    }
}

impl From<RoundEvent> for Event {
    fn from(event: RoundEvent) -> Self {
        Event::Round(event)
    }
}

impl From<InputEvent> for Event {
    fn from(event: InputEvent) -> Self {
        Event::Input(event)
    }
}

impl From<PlaybackEvent> for Event {
    fn from(event: PlaybackEvent) -> Self {
        Event::Playback(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. One broadcast channel exists per topic for the
/// lifetime of the bus.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; 3]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL.map(|_| broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    ///
    /// Best-effort: an event nobody listens to is dropped, and slow
    /// subscribers lag rather than stall the coordinator.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.channels[topic.slot()].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic.slot()].subscribe()
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
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use game_core::ActorId;

    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut rounds = bus.subscribe(Topic::Round);
        let mut playback = bus.subscribe(Topic::Playback);

        bus.publish(RoundEvent::RoundStarted {
            round: 1,
            live: vec![ActorId(0)],
        });
        bus.publish(InputEvent::TurnEnded {
            round: 1,
            actor: ActorId(0),
        });

        let event = rounds.recv().await.unwrap();
        assert_eq!(event.topic(), Topic::Round);
        assert!(playback.try_recv().is_err());
        assert!(rounds.try_recv().is_err());
    }

    #[tokio::test]
    async fn zero_capacity_still_delivers() {
        let bus = EventBus::with_capacity(0);
        let mut rounds = bus.subscribe(Topic::Round);

        bus.publish(RoundEvent::RoundEnded {
            round: 1,
            ticks_played: 2,
        });

        let event = rounds.recv().await.unwrap();
        assert_eq!(
            event,
            Event::Round(RoundEvent::RoundEnded {
                round: 1,
                ticks_played: 2,
            })
        );
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.publish(RoundEvent::RoundEnded {
            round: 3,
            ticks_played: 0,
        });
    }

    #[test]
    fn events_serialize_with_their_topic_tag() {
        let event = Event::from(PlaybackEvent::ActionCompleted {
            round: 2,
            tick: 1,
            actor: ActorId(3),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.starts_with(r#"{"Playback":{"ActionCompleted""#));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.topic(), Topic::Playback);
    }

    #[test]
    fn subscribe_multiple_returns_one_receiver_per_topic() {
        let bus = EventBus::default();
        let receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 3);
    }
}
