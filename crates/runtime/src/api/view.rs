//! Animation collaborator and the single-fire completion signal.
//!
//! The coordinator hands every dispatched action to an [`AnimationView`]
//! together with a [`CompletionSignal`]. Calling
//! [`CompletionSignal::complete`] is the only way a playback tick advances.
use game_core::{Action, ActionOutcome, ActorId, PlayedAction};
use tokio::sync::mpsc;

/// Everything the view needs to animate one dispatched action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionStart {
    pub round: u32,
    pub tick: u32,
    pub played: PlayedAction,
}

impl ActionStart {
    pub fn actor(&self) -> ActorId {
        self.played.actor
    }

    pub fn action(&self) -> Action {
        self.played.action
    }

    pub fn outcome(&self) -> ActionOutcome {
        self.played.outcome
    }

    /// Name the view dispatches on, e.g. `"move"` or `"melee_attack"`.
    pub fn kind(&self) -> &'static str {
        self.played.action.as_snake_case()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Completion {
    Done(ActorId),
    Dropped(ActorId),
}

/// One-shot completion handle for a dispatched action.
///
/// `complete` consumes the signal, so a second completion for the same
/// action cannot be expressed. Dropping it without completing is reported to
/// the barrier.
#[derive(Debug)]
#[must_use = "the tick does not advance until the signal is completed"]
pub struct CompletionSignal {
    actor: ActorId,
    tx: Option<mpsc::UnboundedSender<Completion>>,
}

impl CompletionSignal {
    pub(crate) fn new(actor: ActorId, tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self { actor, tx: Some(tx) }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn complete(mut self) {
        if let Some(tx) = self.tx.take() {
            // Barrier gone means the coordinator already gave up on the tick.
            let _ = tx.send(Completion::Done(self.actor));
        }
    }
}

impl Drop for CompletionSignal {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(Completion::Dropped(self.actor));
        }
    }
}

/// Receives action-start notifications. Fire-and-forget: the call must not
/// block, and the view reports completion later through the signal.
pub trait AnimationView: Send + Sync {
    fn on_action_start(&self, start: ActionStart, signal: CompletionSignal);
}

/// Completes every action immediately. For headless runs and tests.
pub struct InstantView;

impl AnimationView for InstantView {
    fn on_action_start(&self, _start: ActionStart, signal: CompletionSignal) {
        signal.complete();
    }
}
