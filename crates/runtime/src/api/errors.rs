//! Unified error types surfaced by the runtime API.
//!
//! Wraps map and actor failures from the core and adds the conditions that
//! only exist once input and animation collaborators are involved.
use thiserror::Error;

use game_core::{ActorError, ActorId, ErrorSeverity, GameError, MapError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("coordinator requires a map before building")]
    MissingMap,

    #[error("coordinator requires an input provider before building")]
    MissingInput,

    #[error("coordinator requires an animation view before building")]
    MissingView,

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Actor(#[from] ActorError),

    #[error("input channel closed")]
    InputClosed,

    #[error("input script for actor {actor} ran out of commands")]
    InputExhausted { actor: ActorId },

    /// The view never reported completion for `pending` before the stall
    /// timeout. Committed state is left as dispatched.
    #[error("animation stalled in round {round}, tick {tick}; still waiting on {pending:?}")]
    StalledAnimation {
        round: u32,
        tick: u32,
        pending: Vec<ActorId>,
    },

    #[error("completion signal for actor {actor} dropped in round {round}, tick {tick}")]
    CompletionDropped { actor: ActorId, round: u32, tick: u32 },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Map(err) => err.severity(),
            Self::Actor(err) => err.severity(),
            Self::StalledAnimation { .. } | Self::CompletionDropped { .. } => {
                ErrorSeverity::Internal
            }
            Self::MissingMap
            | Self::MissingInput
            | Self::MissingView
            | Self::InputClosed
            | Self::InputExhausted { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingMap => "RUNTIME_MISSING_MAP",
            Self::MissingInput => "RUNTIME_MISSING_INPUT",
            Self::MissingView => "RUNTIME_MISSING_VIEW",
            Self::Map(err) => err.error_code(),
            Self::Actor(err) => err.error_code(),
            Self::InputClosed => "RUNTIME_INPUT_CLOSED",
            Self::InputExhausted { .. } => "RUNTIME_INPUT_EXHAUSTED",
            Self::StalledAnimation { .. } => "RUNTIME_STALLED_ANIMATION",
            Self::CompletionDropped { .. } => "RUNTIME_COMPLETION_DROPPED",
        }
    }
}
