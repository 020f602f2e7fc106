//! Event types for different topics.

use game_core::{ActorId, IllegalAction, InputCommand, PlayedAction, Position, QueuedAction};
use serde::{Deserialize, Serialize};

/// Round lifecycle, for telemetry and UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundEvent {
    RoundStarted {
        round: u32,
        /// Live actors in registration order, i.e. collecting order.
        live: Vec<ActorId>,
    },
    RoundEnded {
        round: u32,
        /// Ticks that dispatched at least one action.
        ticks_played: u32,
    },
}

/// Collecting-phase events for the acting actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    TurnStarted {
        round: u32,
        actor: ActorId,
        action_points: u32,
    },

    /// Recomputed after `start_round` and after every accepted command.
    LegalTargets {
        actor: ActorId,
        targets: Vec<Position>,
    },

    ActionQueued {
        actor: ActorId,
        queued: QueuedAction,
        remaining: u32,
    },

    /// The command had no effect; queue and budget are unchanged.
    ActionRejected {
        actor: ActorId,
        command: InputCommand,
        reason: IllegalAction,
    },

    TurnEnded {
        round: u32,
        actor: ActorId,
    },
}

/// Playback-phase events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    TickStarted {
        round: u32,
        tick: u32,
        dispatched: Vec<ActorId>,
    },
    ActionStarted {
        round: u32,
        tick: u32,
        played: PlayedAction,
    },
    ActionCompleted {
        round: u32,
        tick: u32,
        actor: ActorId,
    },
    ActorDied {
        round: u32,
        tick: u32,
        actor: ActorId,
        killer: ActorId,
    },
}
