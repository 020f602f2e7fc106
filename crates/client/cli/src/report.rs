//! Turns bus events into a readable match log.
use game_core::ActionOutcome;
use runtime::{Event, EventBus, InputEvent, PlaybackEvent, RoundEvent, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawns one reporter task per topic. Each ends when the bus is dropped.
pub fn spawn(bus: &EventBus) -> Vec<JoinHandle<()>> {
    Topic::ALL
        .into_iter()
        .map(|topic| {
            let mut rx = bus.subscribe(topic);
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => report(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(?topic, skipped, "reporter lagged behind");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

fn report(event: &Event) {
    match event {
        Event::Round(RoundEvent::RoundStarted { round, live }) => {
            tracing::info!("── round {round} ── {} actors standing", live.len());
        }
        Event::Round(RoundEvent::RoundEnded { .. }) => {}
        Event::Input(InputEvent::ActionQueued {
            actor,
            queued,
            remaining,
        }) => {
            tracing::info!(
                "{actor} queues {:?} for {} AP ({remaining} left)",
                queued.action,
                queued.cost
            );
        }
        Event::Input(InputEvent::ActionRejected {
            actor,
            command,
            reason,
        }) => {
            tracing::info!("{actor} cannot {command:?}: {reason}");
        }
        Event::Input(_) => {}
        Event::Playback(PlaybackEvent::ActionStarted { tick, played, .. }) => {
            match played.outcome {
                ActionOutcome::Moved { to, .. } => {
                    tracing::info!(
                        "[tick {tick}] {} moves to {} (elevation {})",
                        played.actor,
                        to.position,
                        to.elevation
                    );
                }
                ActionOutcome::Waited => {
                    tracing::info!("[tick {tick}] {} waits", played.actor);
                }
                ActionOutcome::Attacked { target, damage, .. } => {
                    tracing::info!(
                        "[tick {tick}] {} hits {target} for {damage}",
                        played.actor
                    );
                }
                ActionOutcome::TargetAlreadyDead { target } => {
                    tracing::info!("[tick {tick}] {} swings at fallen {target}", played.actor);
                }
            }
        }
        Event::Playback(PlaybackEvent::ActorDied { actor, killer, .. }) => {
            tracing::info!("{actor} was slain by {killer}");
        }
        Event::Playback(_) => {}
    }
}
