//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const BUNDLED_MAP: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../game/content/data/maps/arena.json"
);

/// Everything the headless driver needs to set up a match.
#[derive(Clone, Debug, PartialEq)]
pub struct CliConfig {
    pub map_path: PathBuf,
    pub game_config_path: Option<PathBuf>,
    pub script_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub actors: usize,
    pub max_rounds: u32,
    pub animation: Duration,
    pub stall_timeout: Option<Duration>,
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            map_path: PathBuf::from(BUNDLED_MAP),
            game_config_path: None,
            script_path: None,
            seed: None,
            actors: 2,
            max_rounds: 20,
            animation: Duration::from_millis(30),
            stall_timeout: None,
            log_dir: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BRAWL_MAP` - Tiled JSON arena (default: bundled arena)
    /// - `BRAWL_GAME_CONFIG` - TOML rules file (default: built-in rules)
    /// - `BRAWL_SCRIPT` - RON input script (default: everyone waits)
    /// - `BRAWL_SEED` - RNG seed for spawns and damage (default: entropy)
    /// - `BRAWL_ACTORS` - Actors to spawn when the script names no spawns (default: 2)
    /// - `BRAWL_MAX_ROUNDS` - Round limit (default: 20)
    /// - `BRAWL_ANIMATION_MS` - Simulated animation length (default: 30)
    /// - `BRAWL_STALL_TIMEOUT_MS` - Abort a tick after this long (default: none)
    /// - `BRAWL_LOG_DIR` - Also write logs to `brawl.log` in this directory
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let parse = |key: &str| read(key).and_then(|value| value.trim().parse::<u64>().ok());

        let mut config = Self::default();

        if let Some(path) = read("BRAWL_MAP") {
            config.map_path = PathBuf::from(path);
        }
        config.game_config_path = read("BRAWL_GAME_CONFIG").map(PathBuf::from);
        config.script_path = read("BRAWL_SCRIPT").map(PathBuf::from);
        config.seed = parse("BRAWL_SEED");

        if let Some(actors) = parse("BRAWL_ACTORS") {
            config.actors = (actors as usize).max(1);
        }
        if let Some(rounds) = parse("BRAWL_MAX_ROUNDS") {
            config.max_rounds = rounds.min(u32::MAX as u64) as u32;
        }
        if let Some(ms) = parse("BRAWL_ANIMATION_MS") {
            config.animation = Duration::from_millis(ms);
        }
        config.stall_timeout = parse("BRAWL_STALL_TIMEOUT_MS").map(Duration::from_millis);
        config.log_dir = read("BRAWL_LOG_DIR").map(PathBuf::from);

        config
    }
}
