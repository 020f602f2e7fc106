//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate:
//! errors, the input collaborator and the animation collaborator.

pub mod errors;
pub mod providers;
pub mod view;

pub use errors::{Result, RuntimeError};
pub use providers::{ChannelInput, InputProvider, ScriptEnd, ScriptedInput, TurnView, WaitInput};
pub use view::{ActionStart, AnimationView, CompletionSignal, InstantView};
