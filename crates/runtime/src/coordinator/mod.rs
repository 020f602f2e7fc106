//! Round orchestration: serialized input collection, then lockstep playback.
//!
//! A round has two phases:
//! - **Collecting**: live actors take turns in registration order. Each gets
//!   its grant and is fed commands from the [`InputProvider`] until its
//!   budget is spent.
//! - **Playing**: `round_depth` ticks. Each tick dispatches the head of every
//!   live actor's queue, then waits on a [`TickBarrier`] until each
//!   dispatched actor's animation reports completion.
//!
//! Dead actors are skipped for collecting and dispatch but stay in the roster
//! for occupancy queries.

mod barrier;
mod builder;
mod collect;
mod playback;

use std::time::Duration;

use game_core::{Actor, ActorId, GameConfig, Position, Roster, TileMap};
use rand::rngs::StdRng;
use tokio::sync::broadcast;

pub use barrier::TickBarrier;
pub use builder::TurnCoordinatorBuilder;

use crate::api::{AnimationView, InputProvider, Result};
use crate::events::{Event, EventBus, RoundEvent, Topic};

/// Runtime configuration shared by the coordinator and its barrier.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub event_buffer_size: usize,
    /// Give up on a tick whose animations have not all completed in time.
    /// `None` waits forever.
    pub stall_timeout: Option<Duration>,
    /// Seed for spawn picks and damage rolls; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            event_buffer_size: 100,
            stall_timeout: None,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorPhase {
    Collecting,
    Playing,
}

/// What happened in one completed round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub round: u32,
    /// Actors whose input was collected, in order.
    pub collected: Vec<ActorId>,
    /// Ticks that dispatched at least one action.
    pub ticks_played: u32,
    pub deaths: Vec<ActorId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub rounds_played: u32,
    pub survivors: Vec<ActorId>,
}

/// Drives rounds over a map and a roster.
///
/// Built with [`TurnCoordinator::builder`]; owns the authoritative map and
/// actors, so all mutation goes through its round loop.
pub struct TurnCoordinator {
    config: RuntimeConfig,
    map: TileMap,
    roster: Roster,
    input: Box<dyn InputProvider>,
    view: Box<dyn AnimationView>,
    events: EventBus,
    rng: StdRng,
    round: u32,
    phase: CoordinatorPhase,
}

impl TurnCoordinator {
    pub fn builder() -> TurnCoordinatorBuilder {
        TurnCoordinatorBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Mutable terrain access between rounds (e.g. the view binding markers).
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.map
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.roster.get(id)
    }

    /// Tiles the actor's next `Target` command would succeed on.
    pub fn legal_targets(&self, id: ActorId) -> Vec<Position> {
        self.roster
            .legal_targets(id)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of the last round started; 0 before the first.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.phase
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// No live actors left, or a single survivor of a multi-actor match.
    pub fn is_over(&self) -> bool {
        match self.roster.live_count() {
            0 => true,
            1 => self.roster.len() > 1,
            _ => false,
        }
    }

    /// Plays one full round.
    ///
    /// Returns `Ok(None)` without advancing the round counter when no actor
    /// is alive.
    pub async fn run_round(&mut self) -> Result<Option<RoundSummary>> {
        let live = self.roster.live_ids();
        if live.is_empty() {
            tracing::debug!("no live actors, skipping round");
            return Ok(None);
        }

        self.round += 1;
        let round = self.round;
        tracing::info!(round, live = live.len(), "round started");
        self.events.publish(RoundEvent::RoundStarted {
            round,
            live: live.clone(),
        });

        self.phase = CoordinatorPhase::Collecting;
        for &actor in &live {
            self.collect_turn(round, actor).await?;
        }

        self.phase = CoordinatorPhase::Playing;
        let (ticks_played, deaths) = self.play(round).await?;
        self.phase = CoordinatorPhase::Collecting;

        tracing::info!(round, ticks_played, deaths = deaths.len(), "round ended");
        self.events.publish(RoundEvent::RoundEnded {
            round,
            ticks_played,
        });

        Ok(Some(RoundSummary {
            round,
            collected: live,
            ticks_played,
            deaths,
        }))
    }

    /// Runs rounds until the match is over or `max_rounds` have been played.
    pub async fn run(&mut self, max_rounds: u32) -> Result<MatchSummary> {
        let mut rounds_played = 0;
        while rounds_played < max_rounds && !self.is_over() {
            if self.run_round().await?.is_none() {
                break;
            }
            rounds_played += 1;
        }

        let survivors = self.roster.live_ids();
        tracing::info!(rounds_played, ?survivors, "match finished");
        Ok(MatchSummary {
            rounds_played,
            survivors,
        })
    }
}
