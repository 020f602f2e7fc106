//! Input script loader.
//!
//! A script fixes spawn positions and the commands each actor submits, in
//! order, so that a match can be replayed without a human at the keyboard.
//!
//! ```ron
//! (
//!     spawns: [(x: 1, y: 1), (x: 6, y: 4)],
//!     actors: {
//!         0: [target(x: 2, y: 1), target(x: 3, y: 2), wait],
//!     },
//! )
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use game_core::{ActorId, InputCommand, Position};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputScript {
    /// Spawn positions by registration order; empty means random spawns.
    #[serde(default)]
    pub spawns: Vec<Position>,
    /// Commands per actor index.
    #[serde(default)]
    pub actors: BTreeMap<u32, Vec<InputCommand>>,
}

impl InputScript {
    pub fn commands(&self, actor: ActorId) -> &[InputCommand] {
        self.actors.get(&actor.0).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Loader for input scripts from RON files.
pub struct ScriptLoader;

impl ScriptLoader {
    pub fn load(path: &Path) -> LoadResult<InputScript> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<InputScript> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse script RON: {}", e))
    }
}
