use crate::state::{ActorId, Facing, Placement, Position};

/// A queued intent, replayed one per playback tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Step by `(dx, dy)`, each component in `-1..=1`.
    Move { dx: i32, dy: i32 },
    Wait,
    MeleeAttack { target: ActorId, facing: Facing },
}

impl Action {
    /// Returns the snake_case name used in logs and view dispatch.
    pub fn as_snake_case(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::Wait => "wait",
            Action::MeleeAttack { .. } => "melee_attack",
        }
    }
}

/// An action together with the points it was charged when queued.
///
/// For moves the cost includes the elevation toll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedAction {
    pub action: Action,
    pub cost: u32,
}

/// A request from the input layer during an actor's collecting turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputCommand {
    Target { x: i32, y: i32 },
    Wait,
}

impl InputCommand {
    pub fn target(position: Position) -> Self {
        Self::Target {
            x: position.x,
            y: position.y,
        }
    }
}

/// Effect of executing a queued action against committed state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    Moved {
        from: Placement,
        to: Placement,
    },
    Waited,
    Attacked {
        target: ActorId,
        raw: i32,
        damage: i32,
        killed: bool,
    },
    /// The target died earlier in the round; the swing hits nothing.
    TargetAlreadyDead {
        target: ActorId,
    },
}

/// A dispatched action and what it did.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayedAction {
    pub actor: ActorId,
    pub action: Action,
    pub outcome: ActionOutcome,
}
