/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Action points added to every live actor at the start of a round.
    ///
    /// Also fixes the number of playback ticks per round, since every queued
    /// action was charged against this same grant.
    pub action_points_per_round: u32,

    /// Hit points each actor starts the match with.
    pub starting_hit_points: i32,

    /// Flat reduction applied to incoming melee damage.
    pub starting_defense: i32,

    /// Exclusive upper bound of the raw melee damage roll (`0..bound`).
    pub melee_damage_range: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Chebyshev reach of a single queued action.
    pub const ACTION_REACH: i32 = 1;
    /// Upper bound on tiles inside the reach, own tile included.
    pub const MAX_REACHABLE_TILES: usize = 9;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTION_POINTS: u32 = 3;
    pub const DEFAULT_HIT_POINTS: i32 = 20;
    pub const DEFAULT_DEFENSE: i32 = 0;
    pub const DEFAULT_MELEE_DAMAGE_RANGE: u32 = 10;

    pub fn new() -> Self {
        Self {
            action_points_per_round: Self::DEFAULT_ACTION_POINTS,
            starting_hit_points: Self::DEFAULT_HIT_POINTS,
            starting_defense: Self::DEFAULT_DEFENSE,
            melee_damage_range: Self::DEFAULT_MELEE_DAMAGE_RANGE,
        }
    }

    pub fn with_action_points(action_points_per_round: u32) -> Self {
        Self {
            action_points_per_round,
            ..Self::new()
        }
    }

    /// Number of synchronized playback ticks in one round.
    pub fn round_depth(&self) -> u32 {
        self.action_points_per_round
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
