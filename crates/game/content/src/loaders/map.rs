//! Arena map loader for Tiled JSON exports.
//!
//! Only the two semantic layers are read: the elevation layer (name contains
//! `lev`) and the object layer (name contains `obj`). Graphic and decoration
//! layers are left to the view.

use std::path::Path;

use game_core::{MapLayers, TileAction, TileMap, TileObject};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const LEVELS_TILESET: &str = "Levels";
const OBJECTS_TILESET: &str = "Objects";

/// Tiled stores flip/rotation flags in the top bits of every gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

/// Object tiles in tileset order; the local tile id is the index.
const OBJECT_KINDS: [TileAction; 10] = [
    TileAction::Walk,
    TileAction::WalkUneven,
    TileAction::Fall,
    TileAction::FallLeft,
    TileAction::FallRight,
    TileAction::Climb,
    TileAction::Die,
    TileAction::FallToDeath,
    TileAction::Spawn,
    TileAction::Item,
];

/// Subset of the Tiled JSON map format the loader understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiledMap {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub layers: Vec<TiledLayer>,
    #[serde(default)]
    pub tilesets: Vec<TiledTileset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiledLayer {
    pub name: String,
    /// Row-major gids; absent on object groups.
    #[serde(default)]
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiledTileset {
    pub name: String,
    pub firstgid: u32,
}

impl TiledMap {
    fn layer(&self, fragment: &str) -> Option<&TiledLayer> {
        self.layers.iter().find(|layer| layer.name.contains(fragment))
    }

    fn firstgid(&self, tileset: &str) -> Option<u32> {
        self.tilesets
            .iter()
            .find(|set| set.name == tileset)
            .map(|set| set.firstgid)
    }

    /// Decodes the semantic layers. Absent layers stay `None` so that the
    /// core reports them.
    pub fn to_layers(&self) -> LoadResult<MapLayers> {
        let levels: Option<Vec<f32>> = match self.layer("lev") {
            Some(layer) => {
                let firstgid = self
                    .firstgid(LEVELS_TILESET)
                    .ok_or_else(|| anyhow::anyhow!("No {} tileset used", LEVELS_TILESET))?;
                Some(layer.data.iter().map(|&gid| decode_level(gid, firstgid)).collect())
            }
            None => None,
        };

        let objects = match self.layer("obj") {
            Some(layer) => {
                let firstgid = self
                    .firstgid(OBJECTS_TILESET)
                    .ok_or_else(|| anyhow::anyhow!("No {} tileset used", OBJECTS_TILESET))?;
                let objects = layer
                    .data
                    .iter()
                    .enumerate()
                    .map(|(index, &gid)| {
                        decode_object(gid, firstgid).ok_or_else(|| {
                            anyhow::anyhow!(
                                "Unknown object tile gid {} at cell {} of layer '{}'",
                                gid,
                                index,
                                layer.name
                            )
                        })
                    })
                    .collect::<LoadResult<Vec<_>>>()?;
                Some(objects)
            }
            None => None,
        };

        Ok(MapLayers {
            width: self.width,
            height: self.height,
            levels,
            objects,
        })
    }
}

/// Every tile step in the `Levels` tileset is half a level, starting at 1.
fn decode_level(gid: u32, firstgid: u32) -> f32 {
    let gid = gid & GID_MASK;
    if gid == 0 {
        return 0.0;
    }
    let level = (gid as f32 - firstgid as f32) / 2.0 + 1.0;
    if level >= 0.0 { level } else { 0.0 }
}

fn decode_object(gid: u32, firstgid: u32) -> Option<TileObject> {
    let gid = gid & GID_MASK;
    if gid == 0 {
        return Some(TileObject::NONE);
    }
    let local = gid.checked_sub(firstgid)? as usize;
    match OBJECT_KINDS.get(local)? {
        TileAction::Spawn => Some(TileObject::spawn()),
        &action => Some(TileObject::new(action)),
    }
}

/// Loader for arena maps exported from Tiled as JSON.
pub struct MapLoader;

impl MapLoader {
    /// Load and validate a map from a Tiled JSON file.
    pub fn load(path: &Path) -> LoadResult<TileMap> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load map {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<TileMap> {
        let layers = Self::parse_layers(content)?;
        TileMap::from_layers(&layers).map_err(|e| anyhow::anyhow!("Invalid map: {}", e))
    }

    /// Decodes the layers without validating them.
    pub fn parse_layers(content: &str) -> LoadResult<MapLayers> {
        let data: TiledMap = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map JSON: {}", e))?;
        data.to_layers()
    }
}
