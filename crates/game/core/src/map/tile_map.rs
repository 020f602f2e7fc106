use rand::Rng;
use rand::seq::SliceRandom;

use super::error::MapError;
use super::tile::{Tile, TileAction, TilePatch};
use crate::actor::Actor;
use crate::state::{ActorId, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Authoritative terrain grid plus the spawn registry.
///
/// Tiles are stored row-major; `(x, y)` lives at `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    dimensions: MapDimensions,
    tiles: Vec<Tile>,
    spawns: Vec<Position>,
}

impl TileMap {
    /// Builds a `width` x `height` grid of default tiles (elevation 0, no action).
    pub fn build(width: u32, height: u32) -> Self {
        let dimensions = MapDimensions::new(width, height);
        let tiles = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Tile::new(Position::new(x, y))))
            .collect();

        Self {
            dimensions,
            tiles,
            spawns: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.dimensions.width as usize + position.x as usize)
    }

    pub fn tile(&self, position: Position) -> Result<&Tile, MapError> {
        self.index(position)
            .map(|i| &self.tiles[i])
            .ok_or(MapError::out_of_bounds(position.x, position.y))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Applies a partial update to an in-bounds tile.
    pub fn set_tile(&mut self, x: i32, y: i32, patch: TilePatch) -> Result<(), MapError> {
        let position = Position::new(x, y);
        let index = self
            .index(position)
            .ok_or(MapError::out_of_bounds(x, y))?;

        let tile = &mut self.tiles[index];
        if let Some(elevation) = patch.elevation {
            tile.elevation = elevation;
        }
        if let Some(action) = patch.action {
            tile.action = action;
        }
        if let Some(marker) = patch.marker {
            tile.marker = Some(marker);
        }

        match patch.spawn {
            Some(true) if !self.spawns.contains(&position) => self.spawns.push(position),
            Some(false) => self.spawns.retain(|&spawn| spawn != position),
            _ => {}
        }

        Ok(())
    }

    /// Elevation at a possibly fractional coordinate.
    ///
    /// Integer coordinates return the tile value. Otherwise the result is the
    /// plain average of the tiles at `(floor x, floor y)` and `(ceil x, ceil y)`.
    pub fn elevation_at(&self, x: f32, y: f32) -> Result<f32, MapError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(MapError::OutOfBounds { x, y });
        }

        let low = Position::new(x.floor() as i32, y.floor() as i32);
        let high = Position::new(x.ceil() as i32, y.ceil() as i32);
        let out_of_bounds = MapError::OutOfBounds { x, y };

        let low_elevation = self.tile(low).map_err(|_| out_of_bounds)?.elevation;
        if low == high {
            return Ok(low_elevation);
        }
        let high_elevation = self.tile(high).map_err(|_| out_of_bounds)?.elevation;

        Ok((low_elevation + high_elevation) / 2.0)
    }

    /// Elevation of the tile at an integer position.
    pub fn elevation_of(&self, position: Position) -> Result<f32, MapError> {
        self.tile(position).map(|tile| tile.elevation)
    }

    pub fn action_kind_at(&self, position: Position) -> Result<TileAction, MapError> {
        self.tile(position).map(|tile| tile.action)
    }

    pub fn spawn_points(&self) -> &[Position] {
        &self.spawns
    }

    pub fn is_spawn(&self, position: Position) -> bool {
        self.spawns.contains(&position)
    }

    /// Uniformly picks a spawn tile.
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Position, MapError> {
        self.spawns
            .choose(rng)
            .copied()
            .ok_or(MapError::NoSpawnPoints)
    }

    /// First live actor whose committed position is `position`.
    pub fn occupant_at(&self, position: Position, actors: &[Actor]) -> Option<ActorId> {
        actors
            .iter()
            .find(|actor| actor.is_alive() && actor.committed().position == position)
            .map(Actor::id)
    }

    /// Dead actor still lying on `position`, if any.
    ///
    /// Corpses are not occupants (they cannot be attacked) but keep the tile
    /// from being walked into.
    pub fn corpse_at(&self, position: Position, actors: &[Actor]) -> Option<ActorId> {
        actors
            .iter()
            .find(|actor| !actor.is_alive() && actor.committed().position == position)
            .map(Actor::id)
    }
}
