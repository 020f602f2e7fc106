//! Headless stand-in for the sprite layer.
use std::time::Duration;

use game_core::Action;
use runtime::{ActionStart, AnimationView, CompletionSignal};

/// Pretends each action takes a fixed time to animate, then completes it.
pub struct TimedView {
    per_action: Duration,
}

impl TimedView {
    pub fn new(per_action: Duration) -> Self {
        Self { per_action }
    }

    fn duration_for(&self, start: &ActionStart) -> Duration {
        match start.action() {
            Action::Wait => self.per_action / 2,
            Action::Move { .. } | Action::MeleeAttack { .. } => self.per_action,
        }
    }
}

impl AnimationView for TimedView {
    fn on_action_start(&self, start: ActionStart, signal: CompletionSignal) {
        let duration = self.duration_for(&start);
        tracing::trace!(actor = %start.actor(), kind = start.kind(), ?duration, "animating");
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            signal.complete();
        });
    }
}
