//! Identifiers and coordinates shared by the map, actors and runtime.
mod common;

pub use common::{ActorId, Facing, Placement, Position};
