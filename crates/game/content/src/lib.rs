//! Data-driven content and the loaders that read it.
//!
//! - Arena maps exported from the Tiled editor (JSON)
//! - Game rules configuration (TOML)
//! - Input scripts for headless matches (RON)
//!
//! Loaders only translate file formats into `game-core` types; all validation
//! of the decoded data happens in the core.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, InputScript, MapLoader, ScriptLoader, TiledLayer, TiledMap, TiledTileset};
