//! Map query and load-time errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors returned by tile queries and spawn selection.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapError {
    /// Coordinate lies outside the grid (or is not a finite number).
    #[error("coordinate ({x}, {y}) is out of bounds")]
    OutOfBounds { x: f32, y: f32 },

    /// The spawn registry is empty.
    #[error("map has no spawn points")]
    NoSpawnPoints,
}

impl MapError {
    pub(crate) fn out_of_bounds(x: i32, y: i32) -> Self {
        Self::OutOfBounds {
            x: x as f32,
            y: y as f32,
        }
    }
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::OutOfBounds { .. } => ErrorSeverity::Recoverable,
            Self::NoSpawnPoints => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfBounds { .. } => "MAP_OUT_OF_BOUNDS",
            Self::NoSpawnPoints => "MAP_NO_SPAWN_POINTS",
        }
    }
}

/// Which layer of a map asset a validation failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    Levels,
    Objects,
}

/// Load-time validation failures. Any of these aborts match initialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapIntegrityError {
    #[error("map has zero width or height")]
    EmptyMap,

    #[error("map is missing its levels (elevation) layer")]
    MissingLevelsLayer,

    #[error("map is missing its objects layer")]
    MissingObjectsLayer,

    #[error("{layer} layer has {found} cells, expected {expected}")]
    LayerSizeMismatch {
        layer: LayerKind,
        expected: usize,
        found: usize,
    },

    #[error("map declares no spawn tiles")]
    NoSpawnTiles,
}

impl GameError for MapIntegrityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMap => "MAP_EMPTY",
            Self::MissingLevelsLayer => "MAP_MISSING_LEVELS",
            Self::MissingObjectsLayer => "MAP_MISSING_OBJECTS",
            Self::LayerSizeMismatch { .. } => "MAP_LAYER_SIZE",
            Self::NoSpawnTiles => "MAP_NO_SPAWN_TILES",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_errors_are_recoverable_and_missing_spawns_fatal() {
        let err = MapError::out_of_bounds(-1, 4);
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert_eq!(err.error_code(), "MAP_OUT_OF_BOUNDS");
        assert_eq!(err.to_string(), "coordinate (-1, 4) is out of bounds");

        assert_eq!(MapError::NoSpawnPoints.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn integrity_errors_are_fatal() {
        let errors = [
            MapIntegrityError::EmptyMap,
            MapIntegrityError::MissingLevelsLayer,
            MapIntegrityError::MissingObjectsLayer,
            MapIntegrityError::LayerSizeMismatch {
                layer: LayerKind::Objects,
                expected: 4,
                found: 3,
            },
            MapIntegrityError::NoSpawnTiles,
        ];
        for err in errors {
            assert_eq!(err.severity(), ErrorSeverity::Fatal, "{err}");
        }
        assert_eq!(
            MapIntegrityError::MissingObjectsLayer.error_code(),
            "MAP_MISSING_OBJECTS"
        );
    }
}
