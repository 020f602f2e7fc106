use game_core::{Attributes, Position, Roster, TileMap};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{CoordinatorPhase, RuntimeConfig, TurnCoordinator};
use crate::api::{AnimationView, InputProvider, Result, RuntimeError};
use crate::events::EventBus;

#[derive(Debug, Clone, Copy)]
enum Spawn {
    Random,
    At(Position, Option<Attributes>),
}

/// Builder for [`TurnCoordinator`] with flexible configuration.
///
/// Actors are registered in the order the spawn calls are made, which is
/// also their collecting order every round.
pub struct TurnCoordinatorBuilder {
    config: RuntimeConfig,
    map: Option<TileMap>,
    input: Option<Box<dyn InputProvider>>,
    view: Option<Box<dyn AnimationView>>,
    events: Option<EventBus>,
    spawns: Vec<Spawn>,
}

impl TurnCoordinatorBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            map: None,
            input: None,
            view: None,
            events: None,
            spawns: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the validated arena (required)
    pub fn map(mut self, map: TileMap) -> Self {
        self.map = Some(map);
        self
    }

    /// Set the input provider (required)
    pub fn input(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    /// Set the animation view (required)
    pub fn view(mut self, view: impl AnimationView + 'static) -> Self {
        self.view = Some(Box::new(view));
        self
    }

    /// Share an existing event bus instead of creating one
    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Register `count` actors on random spawn tiles
    pub fn spawn_random(mut self, count: usize) -> Self {
        self.spawns.extend(std::iter::repeat_n(Spawn::Random, count));
        self
    }

    /// Register an actor at a fixed position with the configured attributes
    pub fn spawn_at(mut self, position: Position) -> Self {
        self.spawns.push(Spawn::At(position, None));
        self
    }

    /// Register an actor at a fixed position with explicit attributes
    pub fn spawn_with(mut self, position: Position, attributes: Attributes) -> Self {
        self.spawns.push(Spawn::At(position, Some(attributes)));
        self
    }

    /// Build the coordinator and place every registered actor.
    pub fn build(self) -> Result<TurnCoordinator> {
        let map = self.map.ok_or(RuntimeError::MissingMap)?;
        let input = self.input.ok_or(RuntimeError::MissingInput)?;
        let view = self.view.ok_or(RuntimeError::MissingView)?;

        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let game = &self.config.game;
        let mut roster = Roster::new();
        for spawn in self.spawns {
            let id = match spawn {
                Spawn::Random => roster.spawn(&map, game, &mut rng)?,
                Spawn::At(position, attributes) => {
                    let attributes = attributes.unwrap_or(Attributes::new(
                        game.starting_hit_points,
                        game.starting_defense,
                    ));
                    roster.spawn_at(&map, position, attributes)?
                }
            };
            if let Some(actor) = roster.get(id) {
                tracing::debug!(%id, position = %actor.committed().position, "actor spawned");
            }
        }

        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        Ok(TurnCoordinator {
            config: self.config,
            map,
            roster,
            input,
            view,
            events,
            rng,
            round: 0,
            phase: CoordinatorPhase::Collecting,
        })
    }
}
