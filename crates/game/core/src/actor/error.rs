//! Actor-side rejections and execution errors.

use super::state::ActorPhase;
use crate::error::{ErrorSeverity, GameError};
use crate::map::{MapError, TileAction};
use crate::state::{ActorId, Position};

/// Why an `attempt_action` request had no effect.
///
/// Rejections are local: the queue, budget and preview are untouched and the
/// round loop carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IllegalAction {
    #[error("actor {0} not found")]
    UnknownActor(ActorId),

    #[error("actor is {phase} and not accepting input")]
    NotAcceptingInput { phase: ActorPhase },

    #[error("target {target} is more than one tile from the preview position")]
    OutOfReach { target: Position },

    #[error("target {target} is out of bounds")]
    OutOfBounds { target: Position },

    #[error("no action points left")]
    NoActionPoints,

    #[error("move needs {required} action points, {available} available")]
    InsufficientActionPoints { required: u32, available: u32 },

    #[error("tile kind {kind} cannot be walked onto")]
    NotWalkable { kind: TileAction },

    #[error("target {target} is blocked by a fallen actor")]
    Blocked { target: Position },
}

impl GameError for IllegalAction {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownActor(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor(_) => "ACTION_UNKNOWN_ACTOR",
            Self::NotAcceptingInput { .. } => "ACTION_NOT_ACCEPTING_INPUT",
            Self::OutOfReach { .. } => "ACTION_OUT_OF_REACH",
            Self::OutOfBounds { .. } => "ACTION_OUT_OF_BOUNDS",
            Self::NoActionPoints => "ACTION_NO_POINTS",
            Self::InsufficientActionPoints { .. } => "ACTION_INSUFFICIENT_POINTS",
            Self::NotWalkable { .. } => "ACTION_NOT_WALKABLE",
            Self::Blocked { .. } => "ACTION_BLOCKED",
        }
    }
}

/// Errors raised while replaying queued actions.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum ActorError {
    #[error("actor {0} not found")]
    UnknownActor(ActorId),

    #[error("actor {0} has nothing queued")]
    NothingQueued(ActorId),

    #[error("actor {actor} is {phase}, expected {expected}")]
    UnexpectedPhase {
        actor: ActorId,
        phase: ActorPhase,
        expected: ActorPhase,
    },

    #[error(transparent)]
    Map(#[from] MapError),
}

impl GameError for ActorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Map(err) => err.severity(),
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor(_) => "ACTOR_UNKNOWN",
            Self::NothingQueued(_) => "ACTOR_NOTHING_QUEUED",
            Self::UnexpectedPhase { .. } => "ACTOR_UNEXPECTED_PHASE",
            Self::Map(err) => err.error_code(),
        }
    }
}
