/// Combat attributes of an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    /// May go negative; the actor is dead at or below zero.
    pub hit_points: i32,
    pub defense: i32,
}

impl Attributes {
    pub const fn new(hit_points: i32, defense: i32) -> Self {
        Self {
            hit_points,
            defense,
        }
    }
}

/// Result of [`Actor::deal_damage`](super::Actor::deal_damage).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub damage: i32,
    pub killed: bool,
}
