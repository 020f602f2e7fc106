//! Terrain grid, tile legality data and the spawn registry.
//!
//! - [`TileMap`] answers elevation, action-kind, spawn and occupancy queries
//! - [`MapLayers`] is the decoded asset shape validated at match start
//! - [`MapError`] is returned at query sites, [`MapIntegrityError`] at load time

mod error;
mod layers;
mod tile;
mod tile_map;

pub use error::{LayerKind, MapError, MapIntegrityError};
pub use layers::{MapLayers, TileObject};
pub use tile::{Tile, TileAction, TileMarker, TilePatch};
pub use tile_map::{MapDimensions, TileMap};
