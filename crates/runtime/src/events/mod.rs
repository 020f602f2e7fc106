//! Topic-based event bus for coordinator events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need. Publishing is best-effort and never blocks a round.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{InputEvent, PlaybackEvent, RoundEvent};
