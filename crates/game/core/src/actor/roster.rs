use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::action::{Action, ActionOutcome, PlayedAction, QueuedAction};
use super::error::{ActorError, IllegalAction};
use super::state::Actor;
use super::stats::{Attributes, DamageReport};
use super::targeting::{self, Resolution};
use crate::config::GameConfig;
use crate::map::{MapError, TileMap};
use crate::state::{ActorId, Placement, Position};

/// Live-actor registry in registration order.
///
/// Every operation that needs to see other actors (occupancy, attacks) goes
/// through the roster so that no actor mutates another behind its back.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.index())
    }

    fn actor(&self, id: ActorId) -> Result<&Actor, ActorError> {
        self.get(id).ok_or(ActorError::UnknownActor(id))
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, ActorError> {
        self.actors
            .get_mut(id.index())
            .ok_or(ActorError::UnknownActor(id))
    }

    /// Ids of actors that are still alive, in registration order.
    pub fn live_ids(&self) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|actor| actor.is_alive())
            .map(Actor::id)
            .collect()
    }

    pub fn live_count(&self) -> usize {
        self.actors.iter().filter(|actor| actor.is_alive()).count()
    }

    /// Registers an actor on a random spawn tile.
    ///
    /// Spawn tiles nobody stands on are preferred; when every spawn is taken
    /// the pick falls back to the whole spawn list.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        map: &TileMap,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<ActorId, MapError> {
        let free: Vec<Position> = map
            .spawn_points()
            .iter()
            .copied()
            .filter(|&spawn| {
                !self
                    .actors
                    .iter()
                    .any(|actor| actor.committed().position == spawn)
            })
            .collect();

        let position = match free.choose(rng) {
            Some(&position) => position,
            None => map.random_spawn(rng)?,
        };

        self.spawn_at(
            map,
            position,
            Attributes::new(config.starting_hit_points, config.starting_defense),
        )
    }

    /// Registers an actor at a fixed in-bounds position.
    pub fn spawn_at(
        &mut self,
        map: &TileMap,
        position: Position,
        attributes: Attributes,
    ) -> Result<ActorId, MapError> {
        let elevation = map.elevation_of(position)?;
        let id = ActorId(self.actors.len() as u32);
        self.actors
            .push(Actor::new(id, Placement::new(position, elevation), attributes));
        Ok(id)
    }

    /// Grants the round's action points and recomputes the legal-target set.
    pub fn start_round(
        &mut self,
        id: ActorId,
        grant: u32,
        map: &TileMap,
    ) -> Result<&BTreeSet<Position>, ActorError> {
        self.actor_mut(id)?.begin_round(grant);
        self.refresh_legal_targets(id, map);
        Ok(self.actor(id)?.legal_targets())
    }

    fn refresh_legal_targets(&mut self, id: ActorId, map: &TileMap) {
        let Some(actor) = self.get(id) else {
            return;
        };
        let targets = targeting::legal_targets(actor, map, &self.actors);
        self.actors[id.index()].set_legal_targets(targets);
    }

    fn apply(&mut self, id: ActorId, resolution: Resolution, map: &TileMap) -> QueuedAction {
        self.actors[id.index()].enqueue(resolution.queued, resolution.preview);
        self.refresh_legal_targets(id, map);
        resolution.queued
    }

    /// Queues whatever a request on `target` resolves to.
    ///
    /// A rejected request leaves queue, budget and preview untouched.
    pub fn attempt_action(
        &mut self,
        id: ActorId,
        target: Position,
        map: &TileMap,
    ) -> Result<QueuedAction, IllegalAction> {
        let actor = self.get(id).ok_or(IllegalAction::UnknownActor(id))?;
        let resolution = targeting::resolve(actor, target, map, &self.actors)?;
        Ok(self.apply(id, resolution, map))
    }

    /// Queues an explicit `Wait` costing one point.
    pub fn attempt_wait(&mut self, id: ActorId, map: &TileMap) -> Result<QueuedAction, IllegalAction> {
        let actor = self.get(id).ok_or(IllegalAction::UnknownActor(id))?;
        let resolution = targeting::resolve_wait(actor)?;
        Ok(self.apply(id, resolution, map))
    }

    pub fn end_round(&mut self, id: ActorId) -> Result<bool, ActorError> {
        Ok(self.actor_mut(id)?.end_round())
    }

    pub fn legal_targets(&self, id: ActorId) -> Option<&BTreeSet<Position>> {
        self.get(id).map(Actor::legal_targets)
    }

    /// Pops the actor's next action and applies it to committed state.
    ///
    /// Moves update position and elevation; attacks roll raw damage in
    /// `0..melee_damage_range` and apply it, defense included, to the target.
    /// The actor stays `Playing` until [`Roster::complete_action`].
    pub fn play_next_action<R: Rng + ?Sized>(
        &mut self,
        id: ActorId,
        map: &TileMap,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<PlayedAction, ActorError> {
        let queued = self.actor_mut(id)?.pop_next()?;

        let outcome = match queued.action {
            Action::Move { dx, dy } => {
                let actor = self.actor_mut(id)?;
                let from = actor.committed();
                let position = from.position.offset(dx, dy);
                let to = Placement::new(position, map.elevation_of(position)?);
                actor.commit(to);
                ActionOutcome::Moved { from, to }
            }
            Action::Wait => ActionOutcome::Waited,
            Action::MeleeAttack { target, .. } => {
                let raw = if config.melee_damage_range == 0 {
                    0
                } else {
                    rng.gen_range(0..config.melee_damage_range) as i32
                };
                let victim = self.actor_mut(target)?;
                if victim.is_alive() {
                    let report = victim.deal_damage(raw, true);
                    ActionOutcome::Attacked {
                        target,
                        raw,
                        damage: report.damage,
                        killed: report.killed,
                    }
                } else {
                    ActionOutcome::TargetAlreadyDead { target }
                }
            }
        };

        Ok(PlayedAction {
            actor: id,
            action: queued.action,
            outcome,
        })
    }

    pub fn complete_action(&mut self, id: ActorId) -> Result<(), ActorError> {
        self.actor_mut(id)?.complete_action()
    }

    pub fn deal_damage(
        &mut self,
        id: ActorId,
        raw: i32,
        apply_defense: bool,
    ) -> Result<DamageReport, ActorError> {
        Ok(self.actor_mut(id)?.deal_damage(raw, apply_defense))
    }
}
