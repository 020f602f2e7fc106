//! Turn-based tactical rules shared by the runtime and offline tools.
//!
//! `game-core` owns the grid ([`map::TileMap`]), per-actor turn state and
//! action queues ([`actor::Actor`], [`actor::Roster`]) and the rules that
//! decide what a request on a tile means. It performs no I/O and never awaits;
//! the round loop lives in the `runtime` crate.
pub mod actor;
pub mod config;
pub mod error;
pub mod map;
pub mod state;

pub use actor::{
    Action, ActionOutcome, Actor, ActorError, ActorPhase, Attributes, DamageReport, IllegalAction,
    InputCommand, PlayedAction, QueuedAction, Roster, elevation_toll, reach,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use map::{
    LayerKind, MapDimensions, MapError, MapIntegrityError, MapLayers, Tile, TileAction,
    TileMarker, TileMap, TileObject, TilePatch,
};
pub use state::{ActorId, Facing, Placement, Position};
