use std::any::Any;
use std::sync::{Arc, Weak};

use crate::state::Position;

/// What an actor may do on (or when entering) a tile.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::FromRepr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[repr(u8)]
pub enum TileAction {
    #[default]
    None = 0,
    Walk = 1,
    WalkUneven = 2,
    Fall = 3,
    FallLeft = 4,
    FallRight = 5,
    Climb = 6,
    Die = 7,
    FallToDeath = 8,
    Spawn = 9,
    Item = 10,
}

impl TileAction {
    /// Tiles a `Move` may target.
    pub fn is_walkable(self) -> bool {
        matches!(self, TileAction::Walk | TileAction::WalkUneven)
    }
}

/// Weak handle to a view-owned object (sprite, affordance shape) bound to a tile.
///
/// The view keeps the strong reference; the map never extends its lifetime.
#[derive(Clone, Debug)]
pub struct TileMarker(Weak<dyn Any + Send + Sync>);

impl TileMarker {
    pub fn attach<M: Any + Send + Sync>(marker: &Arc<M>) -> Self {
        let strong: Arc<dyn Any + Send + Sync> = marker.clone();
        Self(Arc::downgrade(&strong))
    }

    /// Returns the marker if the view still holds it and it has type `M`.
    pub fn upgrade<M: Any + Send + Sync>(&self) -> Option<Arc<M>> {
        self.0.upgrade()?.downcast::<M>().ok()
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl PartialEq for TileMarker {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

/// One grid cell.
///
/// Occupancy is not stored here; it is derived by scanning actors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Tile {
    pub position: Position,
    pub elevation: f32,
    pub action: TileAction,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub marker: Option<TileMarker>,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            elevation: 0.0,
            action: TileAction::None,
            marker: None,
        }
    }
}

/// Partial update applied by [`TileMap::set_tile`](super::TileMap::set_tile).
///
/// Unset fields leave the tile untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TilePatch {
    pub elevation: Option<f32>,
    pub action: Option<TileAction>,
    pub spawn: Option<bool>,
    pub marker: Option<TileMarker>,
}

impl TilePatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn elevation(mut self, elevation: f32) -> Self {
        self.elevation = Some(elevation);
        self
    }

    #[must_use]
    pub fn action(mut self, action: TileAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn spawn(mut self, spawn: bool) -> Self {
        self.spawn = Some(spawn);
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: TileMarker) -> Self {
        self.marker = Some(marker);
        self
    }
}
