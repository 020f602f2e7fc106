use game_core::{ActionOutcome, Actor, ActorId};

use super::{TickBarrier, TurnCoordinator};
use crate::api::{ActionStart, Result};
use crate::events::PlaybackEvent;

impl TurnCoordinator {
    /// Replays the round's queues in `round_depth` synchronized ticks.
    ///
    /// Every eligible actor is dispatched before any completion is awaited.
    /// Returns the number of ticks that dispatched anything and the actors
    /// killed during playback.
    pub(super) async fn play(&mut self, round: u32) -> Result<(u32, Vec<ActorId>)> {
        let depth = self.config.game.round_depth();
        let mut ticks_played = 0;
        let mut deaths = Vec::new();

        for tick in 1..=depth {
            let eligible: Vec<ActorId> = self
                .roster
                .actors()
                .iter()
                .filter(|actor| actor.is_alive() && actor.has_queued())
                .map(Actor::id)
                .collect();
            if eligible.is_empty() {
                tracing::debug!(round, tick, "nothing queued, tick skipped");
                continue;
            }

            ticks_played += 1;
            tracing::debug!(round, tick, dispatched = ?eligible, "tick started");
            self.events.publish(PlaybackEvent::TickStarted {
                round,
                tick,
                dispatched: eligible.clone(),
            });

            let mut barrier = TickBarrier::new(round, tick, self.config.stall_timeout);
            for actor in eligible {
                // Killed by an earlier dispatch in this tick.
                let still_eligible = self
                    .roster
                    .get(actor)
                    .is_some_and(|state| state.is_alive() && state.has_queued());
                if !still_eligible {
                    continue;
                }

                let played =
                    self.roster
                        .play_next_action(actor, &self.map, &self.config.game, &mut self.rng)?;

                self.events.publish(PlaybackEvent::ActionStarted {
                    round,
                    tick,
                    played,
                });

                if let ActionOutcome::Attacked {
                    target,
                    damage,
                    killed: true,
                    ..
                } = played.outcome
                {
                    tracing::info!(round, tick, %target, killer = %actor, damage, "actor died");
                    deaths.push(target);
                    self.events.publish(PlaybackEvent::ActorDied {
                        round,
                        tick,
                        actor: target,
                        killer: actor,
                    });
                }

                let signal = barrier.register(actor);
                self.view
                    .on_action_start(ActionStart { round, tick, played }, signal);
            }

            while let Some(actor) = barrier.next_completion().await? {
                self.roster.complete_action(actor)?;
                self.events.publish(PlaybackEvent::ActionCompleted { round, tick, actor });
            }
        }

        Ok((ticks_played, deaths))
    }
}
