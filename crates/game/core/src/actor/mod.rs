//! Actors: per-entity turn state, action queues and the rules for queuing.
//!
//! Requests are validated against the actor's *preview* placement (where it
//! will be once its queue has replayed), charged up front and appended to the
//! queue. Execution happens later, one action per playback tick, through
//! [`Roster::play_next_action`].
mod action;
mod error;
mod roster;
mod state;
mod stats;
mod targeting;

pub use action::{Action, ActionOutcome, InputCommand, PlayedAction, QueuedAction};
pub use error::{ActorError, IllegalAction};
pub use roster::Roster;
pub use state::{Actor, ActorPhase};
pub use stats::{Attributes, DamageReport};
pub use targeting::{elevation_toll, reach};
