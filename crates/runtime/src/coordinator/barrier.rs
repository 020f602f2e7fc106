//! Per-tick join barrier over completion signals.
//!
//! Every actor dispatched in a tick gets a [`CompletionSignal`] registered
//! with the tick's barrier. The barrier resolves when each registered signal
//! has either completed or been dropped; it is keyed to the dispatched set,
//! not to the number of live actors.
use std::collections::BTreeSet;
use std::time::Duration;

use game_core::{ActorId, GameError};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::api::view::{Completion, CompletionSignal};
use crate::api::{Result, RuntimeError};

pub struct TickBarrier {
    round: u32,
    tick: u32,
    pending: BTreeSet<ActorId>,
    dropped: Option<ActorId>,
    deadline: Option<Instant>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl TickBarrier {
    /// Creates a barrier; the stall clock starts now.
    pub fn new(round: u32, tick: u32, stall_timeout: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            round,
            tick,
            pending: BTreeSet::new(),
            dropped: None,
            deadline: stall_timeout.map(|timeout| Instant::now() + timeout),
            tx,
            rx,
        }
    }

    /// Registers a dispatched actor and returns the signal the view completes.
    pub fn register(&mut self, actor: ActorId) -> CompletionSignal {
        self.pending.insert(actor);
        CompletionSignal::new(actor, self.tx.clone())
    }

    pub fn pending(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.pending.iter().copied()
    }

    pub fn is_resolved(&self) -> bool {
        self.pending.is_empty()
    }

    /// Waits for the next completion.
    ///
    /// Returns `Ok(None)` once every registered signal has resolved. A dropped
    /// signal is held back until the rest of the tick resolves and then
    /// reported as [`RuntimeError::CompletionDropped`].
    pub async fn next_completion(&mut self) -> Result<Option<ActorId>> {
        while !self.pending.is_empty() {
            let message = match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, self.rx.recv())
                    .await
                    .map_err(|_| self.stalled())?,
                None => self.rx.recv().await,
            };

            // The barrier holds a sender itself, so the channel never closes
            // while signals are outstanding.
            let Some(message) = message else {
                break;
            };

            let (actor, done) = match message {
                Completion::Done(actor) => (actor, true),
                Completion::Dropped(actor) => (actor, false),
            };
            if !self.pending.remove(&actor) {
                tracing::trace!(%actor, "ignoring completion for unregistered actor");
                continue;
            }
            if done {
                return Ok(Some(actor));
            }
            tracing::warn!(
                round = self.round,
                tick = self.tick,
                %actor,
                "completion signal dropped without completing"
            );
            self.dropped.get_or_insert(actor);
        }

        match self.dropped.take() {
            Some(actor) => Err(RuntimeError::CompletionDropped {
                actor,
                round: self.round,
                tick: self.tick,
            }),
            None => Ok(None),
        }
    }

    fn stalled(&self) -> RuntimeError {
        let err = RuntimeError::StalledAnimation {
            round: self.round,
            tick: self.tick,
            pending: self.pending().collect(),
        };
        tracing::warn!(
            round = self.round,
            tick = self.tick,
            code = err.error_code(),
            severity = err.severity().as_str(),
            "{err}"
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_after_every_dispatched_actor_completes() {
        let mut barrier = TickBarrier::new(1, 1, None);
        let a = barrier.register(ActorId(0));
        let b = barrier.register(ActorId(1));

        b.complete();
        a.complete();

        assert_eq!(barrier.next_completion().await.unwrap(), Some(ActorId(1)));
        assert!(!barrier.is_resolved());
        assert_eq!(barrier.next_completion().await.unwrap(), Some(ActorId(0)));
        assert_eq!(barrier.next_completion().await.unwrap(), None);
        assert!(barrier.is_resolved());
    }

    #[tokio::test]
    async fn empty_barrier_is_trivially_resolved() {
        let mut barrier = TickBarrier::new(1, 2, Some(Duration::from_millis(1)));
        assert_eq!(barrier.next_completion().await.unwrap(), None);
    }

    #[tokio::test]
    async fn completion_from_another_task_advances() {
        let mut barrier = TickBarrier::new(2, 1, None);
        let signal = barrier.register(ActorId(3));
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            signal.complete();
        });
        assert_eq!(barrier.next_completion().await.unwrap(), Some(ActorId(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn stall_timeout_names_pending_actors() {
        let mut barrier = TickBarrier::new(4, 2, Some(Duration::from_secs(1)));
        let held = barrier.register(ActorId(0));
        barrier.register(ActorId(1)).complete();

        assert_eq!(barrier.next_completion().await.unwrap(), Some(ActorId(1)));
        let err = barrier.next_completion().await.unwrap_err();
        match err {
            RuntimeError::StalledAnimation {
                round,
                tick,
                pending,
            } => {
                assert_eq!((round, tick), (4, 2));
                assert_eq!(pending, vec![ActorId(0)]);
            }
            other => panic!("unexpected error: {other}"),
        }
        drop(held);
    }

    #[tokio::test]
    async fn dropped_signal_is_reported_after_the_rest_resolves() {
        let mut barrier = TickBarrier::new(1, 1, None);
        drop(barrier.register(ActorId(0)));
        barrier.register(ActorId(1)).complete();

        assert_eq!(barrier.next_completion().await.unwrap(), Some(ActorId(1)));
        assert!(matches!(
            barrier.next_completion().await,
            Err(RuntimeError::CompletionDropped {
                actor: ActorId(0),
                ..
            })
        ));
    }
}
