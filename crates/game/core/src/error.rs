//! Severity classification shared by every game-core error.
//!
//! Each domain keeps its own error enum next to the operations it guards
//! (`MapError` and `MapIntegrityError` in [`crate::map`], `IllegalAction` and
//! `ActorError` in [`crate::actor`]). They all implement [`GameError`] so the
//! runtime can log and route them uniformly.
//!
//! Per-turn rejections are `Validation` and never abort a round; only
//! load-time conditions are `Fatal`.

/// How a caller is expected to react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Ignored at the query site, e.g. a coordinate outside the grid.
    Recoverable,

    /// Rejected request; the state is untouched and the caller may ask again.
    ///
    /// Examples: target out of reach, not enough action points
    Validation,

    /// State inconsistency between the coordinator and an actor.
    ///
    /// Examples: unknown actor index, completion for an idle actor
    Internal,

    /// The match cannot start or continue.
    ///
    /// Examples: missing map layer, no spawn tiles
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }
}

/// Common trait for all game-core errors.
///
/// Derive `thiserror::Error` for the message and classify severity by how
/// the caller recovers, not by impact.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and tests, e.g. `"MAP_OUT_OF_BOUNDS"`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
