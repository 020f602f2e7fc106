//! Semantic shape of a decoded map asset and its load-time validation.
//!
//! Asset loaders (tile editors, procedural generators, test fixtures) produce a
//! [`MapLayers`]; the core never looks at the asset's on-disk layout.

use super::error::{LayerKind, MapIntegrityError};
use super::tile::{TileAction, TilePatch};
use super::tile_map::TileMap;

/// Object-layer entry for a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileObject {
    pub action: TileAction,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawn: bool,
}

impl TileObject {
    pub const NONE: Self = Self {
        action: TileAction::None,
        spawn: false,
    };

    pub const fn new(action: TileAction) -> Self {
        Self {
            action,
            spawn: false,
        }
    }

    /// A spawn point actors can also walk over.
    pub const fn spawn() -> Self {
        Self {
            action: TileAction::Walk,
            spawn: true,
        }
    }
}

/// Fully decoded map grid, row-major, one entry per cell in each layer.
///
/// A layer set to `None` was absent from the asset.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapLayers {
    pub width: u32,
    pub height: u32,
    pub levels: Option<Vec<f32>>,
    pub objects: Option<Vec<TileObject>>,
}

impl MapLayers {
    /// Flat terrain of a single object kind, handy for scenarios and tests.
    pub fn uniform(width: u32, height: u32, elevation: f32, object: TileObject) -> Self {
        let area = width as usize * height as usize;
        Self {
            width,
            height,
            levels: Some(vec![elevation; area]),
            objects: Some(vec![object; area]),
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Overrides one cell of the object layer, if present and in bounds.
    #[must_use]
    pub fn with_object(mut self, x: u32, y: u32, object: TileObject) -> Self {
        let index = self.index(x, y);
        if x < self.width
            && let Some(cell) = self.objects.as_mut().and_then(|o| o.get_mut(index))
        {
            *cell = object;
        }
        self
    }

    /// Overrides one cell of the levels layer, if present and in bounds.
    #[must_use]
    pub fn with_level(mut self, x: u32, y: u32, elevation: f32) -> Self {
        let index = self.index(x, y);
        if x < self.width
            && let Some(cell) = self.levels.as_mut().and_then(|l| l.get_mut(index))
        {
            *cell = elevation;
        }
        self
    }
}

impl TileMap {
    /// Builds the map from decoded layers, enforcing load-time integrity.
    ///
    /// Both layers must be present and sized `width * height`, and at least
    /// one spawn tile must exist.
    pub fn from_layers(layers: &MapLayers) -> Result<Self, MapIntegrityError> {
        let area = layers.width as usize * layers.height as usize;
        if area == 0 {
            return Err(MapIntegrityError::EmptyMap);
        }

        let levels = layers
            .levels
            .as_ref()
            .ok_or(MapIntegrityError::MissingLevelsLayer)?;
        let objects = layers
            .objects
            .as_ref()
            .ok_or(MapIntegrityError::MissingObjectsLayer)?;

        if levels.len() != area {
            return Err(MapIntegrityError::LayerSizeMismatch {
                layer: LayerKind::Levels,
                expected: area,
                found: levels.len(),
            });
        }
        if objects.len() != area {
            return Err(MapIntegrityError::LayerSizeMismatch {
                layer: LayerKind::Objects,
                expected: area,
                found: objects.len(),
            });
        }

        let mut map = TileMap::build(layers.width, layers.height);
        let width = layers.width as usize;
        for (index, (&elevation, object)) in levels.iter().zip(objects).enumerate() {
            let x = (index % width) as i32;
            let y = (index / width) as i32;
            // Spawn objects are walkable spawn points.
            let (action, spawn) = match object.action {
                TileAction::Spawn => (TileAction::Walk, true),
                action => (action, object.spawn),
            };
            let patch = TilePatch::new()
                .elevation(elevation)
                .action(action)
                .spawn(spawn);
            // In bounds by construction of `index`.
            if map.set_tile(x, y, patch).is_err() {
                return Err(MapIntegrityError::EmptyMap);
            }
        }

        if map.spawn_points().is_empty() {
            return Err(MapIntegrityError::NoSpawnTiles);
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    #[test]
    fn missing_layers_are_fatal() {
        let mut layers = MapLayers::uniform(2, 2, 0.0, TileObject::spawn());
        layers.levels = None;
        assert_eq!(
            TileMap::from_layers(&layers),
            Err(MapIntegrityError::MissingLevelsLayer)
        );

        let mut layers = MapLayers::uniform(2, 2, 0.0, TileObject::spawn());
        layers.objects = None;
        assert_eq!(
            TileMap::from_layers(&layers),
            Err(MapIntegrityError::MissingObjectsLayer)
        );
    }

    #[test]
    fn map_without_spawn_tiles_is_rejected() {
        let layers = MapLayers::uniform(3, 3, 0.0, TileObject::new(TileAction::Walk));
        assert_eq!(
            TileMap::from_layers(&layers),
            Err(MapIntegrityError::NoSpawnTiles)
        );
    }

    #[test]
    fn layer_size_must_match_dimensions() {
        let mut layers = MapLayers::uniform(3, 2, 0.0, TileObject::spawn());
        layers.levels = Some(vec![0.0; 5]);
        assert_eq!(
            TileMap::from_layers(&layers),
            Err(MapIntegrityError::LayerSizeMismatch {
                layer: LayerKind::Levels,
                expected: 6,
                found: 5,
            })
        );
    }

    #[test]
    fn empty_map_is_rejected() {
        let layers = MapLayers::uniform(0, 4, 0.0, TileObject::spawn());
        assert_eq!(
            TileMap::from_layers(&layers),
            Err(MapIntegrityError::EmptyMap)
        );
    }

    #[test]
    fn spawn_objects_become_walkable_spawn_points() {
        let layers = MapLayers::uniform(3, 1, 0.0, TileObject::new(TileAction::Walk))
            .with_object(1, 0, TileObject::new(TileAction::Spawn));
        let map = TileMap::from_layers(&layers).unwrap();

        assert_eq!(map.spawn_points(), &[Position::new(1, 0)]);
        assert_eq!(
            map.action_kind_at(Position::new(1, 0)).unwrap(),
            TileAction::Walk
        );
    }

    #[test]
    fn layers_are_row_major() {
        let layers = MapLayers::uniform(3, 2, 0.0, TileObject::new(TileAction::Walk))
            .with_level(2, 1, 1.5)
            .with_object(0, 1, TileObject::spawn())
            .with_object(1, 0, TileObject::new(TileAction::FallToDeath));
        let map = TileMap::from_layers(&layers).unwrap();

        assert_eq!(map.elevation_of(Position::new(2, 1)).unwrap(), 1.5);
        assert_eq!(
            map.action_kind_at(Position::new(1, 0)).unwrap(),
            TileAction::FallToDeath
        );
        assert_eq!(map.spawn_points(), &[Position::new(0, 1)]);
        assert_eq!(
            map.action_kind_at(Position::new(0, 1)).unwrap(),
            TileAction::Walk
        );
    }
}
