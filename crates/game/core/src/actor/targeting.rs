//! Legality of a requested target, evaluated from the actor's preview position.
//!
//! Resolution order for a tile within reach:
//! 1. a live actor with a different index stands there: `MeleeAttack` (1 point)
//! 2. own preview tile: `Wait` (1 point)
//! 3. a walkable tile: `Move` costing the elevation toll plus 1
//! 4. anything else is rejected

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use super::action::{Action, QueuedAction};
use super::error::IllegalAction;
use super::state::Actor;
use crate::config::GameConfig;
use crate::map::TileMap;
use crate::state::{ActorId, Facing, Placement, Position};

/// A request that passed validation, ready to be charged and queued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Resolution {
    pub queued: QueuedAction,
    pub preview: Placement,
}

/// Extra points charged for changing elevation: `floor(|from - to|)`.
pub fn elevation_toll(from: f32, to: f32) -> u32 {
    (from - to).abs().floor() as u32
}

/// Tiles within one step of `center`, `center` included, in row-major order.
pub fn reach(center: Position) -> ArrayVec<Position, { GameConfig::MAX_REACHABLE_TILES }> {
    let span = -GameConfig::ACTION_REACH..=GameConfig::ACTION_REACH;
    span.clone()
        .flat_map(|dy| span.clone().map(move |dx| center.offset(dx, dy)))
        .collect()
}

fn ensure_accepting(actor: &Actor) -> Result<(), IllegalAction> {
    if !actor.phase().accepts_input() {
        return Err(IllegalAction::NotAcceptingInput {
            phase: actor.phase(),
        });
    }
    if actor.action_points() == 0 {
        return Err(IllegalAction::NoActionPoints);
    }
    Ok(())
}

pub(crate) fn resolve_wait(actor: &Actor) -> Result<Resolution, IllegalAction> {
    ensure_accepting(actor)?;
    Ok(Resolution {
        queued: QueuedAction {
            action: Action::Wait,
            cost: 1,
        },
        preview: actor.preview(),
    })
}

pub(crate) fn resolve(
    actor: &Actor,
    target: Position,
    map: &TileMap,
    actors: &[Actor],
) -> Result<Resolution, IllegalAction> {
    ensure_accepting(actor)?;

    let origin = actor.preview();
    if origin.position.chebyshev(target) > GameConfig::ACTION_REACH as u32 {
        return Err(IllegalAction::OutOfReach { target });
    }
    if !map.contains(target) {
        return Err(IllegalAction::OutOfBounds { target });
    }

    let (dx, dy) = origin.position.delta_to(target);

    // Occupants are checked before the own-tile wait, so an actor sharing a
    // tile after a lockstep move attacks whoever stands there with it.
    if let Some(occupant) = occupant_other_than(actor, target, actors) {
        return Ok(Resolution {
            queued: QueuedAction {
                action: Action::MeleeAttack {
                    target: occupant,
                    facing: Facing::from_delta(dx, dy),
                },
                cost: 1,
            },
            preview: origin,
        });
    }

    if target == origin.position {
        return resolve_wait(actor);
    }

    if map.corpse_at(target, actors).is_some() {
        return Err(IllegalAction::Blocked { target });
    }

    let tile = map
        .tile(target)
        .map_err(|_| IllegalAction::OutOfBounds { target })?;
    if !tile.action.is_walkable() {
        return Err(IllegalAction::NotWalkable { kind: tile.action });
    }

    let required = elevation_toll(origin.elevation, tile.elevation) + 1;
    if actor.action_points() < required {
        return Err(IllegalAction::InsufficientActionPoints {
            required,
            available: actor.action_points(),
        });
    }

    Ok(Resolution {
        queued: QueuedAction {
            action: Action::Move { dx, dy },
            cost: required,
        },
        preview: Placement::new(target, tile.elevation),
    })
}

/// First live actor other than `actor` whose committed position is `target`.
fn occupant_other_than(actor: &Actor, target: Position, actors: &[Actor]) -> Option<ActorId> {
    actors
        .iter()
        .filter(|other| other.id() != actor.id())
        .find(|other| other.is_alive() && other.committed().position == target)
        .map(Actor::id)
}

/// Every tile a request would currently succeed on.
pub(crate) fn legal_targets(actor: &Actor, map: &TileMap, actors: &[Actor]) -> BTreeSet<Position> {
    reach(actor.preview().position)
        .into_iter()
        .filter(|&target| resolve(actor, target, map, actors).is_ok())
        .collect()
}
