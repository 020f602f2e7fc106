//! Round orchestration for the tactical grid game.
//!
//! This crate wires the pure rules in `game-core` to the two asynchronous
//! collaborators a match needs: an input layer that chooses commands during
//! an actor's collecting turn, and an animation view that reports when each
//! dispatched action has finished playing. Consumers build a
//! [`TurnCoordinator`] and drive it round by round.
//!
//! Modules are organized by responsibility:
//! - [`coordinator`] hosts the round loop, builder and per-tick barrier
//! - [`api`] exposes the collaborator traits and error types
//! - [`events`] provides the topic-based event bus
pub mod api;
pub mod coordinator;
pub mod events;

pub use api::{
    ActionStart, AnimationView, ChannelInput, CompletionSignal, InputProvider, InstantView,
    Result, RuntimeError, ScriptEnd, ScriptedInput, TurnView, WaitInput,
};
pub use coordinator::{
    CoordinatorPhase, MatchSummary, RoundSummary, RuntimeConfig, TickBarrier, TurnCoordinator,
    TurnCoordinatorBuilder,
};
pub use events::{Event, EventBus, InputEvent, PlaybackEvent, RoundEvent, Topic};
