use std::collections::{BTreeSet, VecDeque};

use super::action::QueuedAction;
use super::error::ActorError;
use super::stats::{Attributes, DamageReport};
use crate::state::{ActorId, Placement, Position};

/// Turn-scoped state of an actor.
///
/// ```text
/// Idle ──input──▶ Queuing ──budget 0──▶ Exhausted ──dispatch──▶ Playing
///   ▲                                        ▲                     │
///   └──────────── queue drained ─────────────┴──── more queued ────┘
/// ```
/// `Dead` is terminal and reachable from every phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ActorPhase {
    Idle,
    Queuing,
    Exhausted,
    Playing,
    Dead,
}

impl ActorPhase {
    pub fn accepts_input(self) -> bool {
        matches!(self, ActorPhase::Idle | ActorPhase::Queuing)
    }
}

/// Per-entity turn state, action queue and attributes.
///
/// `committed` is authoritative and changes only when a queued action is
/// executed. `preview` is where the actor will stand once its queue has been
/// replayed, and is what later requests in the same round are validated from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Actor {
    id: ActorId,
    committed: Placement,
    preview: Placement,
    action_points: u32,
    queue: VecDeque<QueuedAction>,
    attributes: Attributes,
    phase: ActorPhase,
    legal_targets: BTreeSet<Position>,
}

impl Actor {
    pub fn new(id: ActorId, placement: Placement, attributes: Attributes) -> Self {
        let phase = if attributes.hit_points > 0 {
            ActorPhase::Idle
        } else {
            ActorPhase::Dead
        };

        Self {
            id,
            committed: placement,
            preview: placement,
            action_points: 0,
            queue: VecDeque::new(),
            attributes,
            phase,
            legal_targets: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn committed(&self) -> Placement {
        self.committed
    }

    pub fn preview(&self) -> Placement {
        self.preview
    }

    pub fn action_points(&self) -> u32 {
        self.action_points
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn phase(&self) -> ActorPhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase != ActorPhase::Dead
    }

    pub fn queue(&self) -> impl ExactSizeIterator<Item = &QueuedAction> {
        self.queue.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Sum of the points charged for everything still queued.
    pub fn queued_cost(&self) -> u32 {
        self.queue.iter().map(|queued| queued.cost).sum()
    }

    pub fn legal_targets(&self) -> &BTreeSet<Position> {
        &self.legal_targets
    }

    /// Adds the round's grant and resets the preview if the last queue drained.
    ///
    /// A queue left over from an interrupted round keeps its preview so new
    /// requests extend it rather than branch from the committed position.
    pub(crate) fn begin_round(&mut self, grant: u32) {
        if !self.is_alive() {
            return;
        }

        self.action_points = self.action_points.saturating_add(grant);
        if self.queue.is_empty() {
            self.preview = self.committed;
            self.phase = ActorPhase::Idle;
        } else {
            self.phase = ActorPhase::Queuing;
        }
        if self.action_points == 0 {
            self.phase = ActorPhase::Exhausted;
        }
    }

    /// Charges `queued.cost` and moves the preview to `preview`.
    ///
    /// Callers have already validated the request against the budget.
    pub(crate) fn enqueue(&mut self, queued: QueuedAction, preview: Placement) {
        debug_assert!(queued.cost <= self.action_points);

        self.action_points -= queued.cost;
        self.queue.push_back(queued);
        self.preview = preview;
        self.phase = if self.action_points == 0 {
            ActorPhase::Exhausted
        } else {
            ActorPhase::Queuing
        };
    }

    pub(crate) fn set_legal_targets(&mut self, targets: BTreeSet<Position>) {
        self.legal_targets = targets;
    }

    /// Reports whether the actor has spent its budget and is ready for playback.
    ///
    /// Once this returns true the actor stops accepting input for the round.
    pub fn end_round(&mut self) -> bool {
        if self.phase == ActorPhase::Exhausted {
            self.legal_targets.clear();
            return true;
        }
        false
    }

    /// Pops the head of the queue and enters `Playing`.
    pub(crate) fn pop_next(&mut self) -> Result<QueuedAction, ActorError> {
        if self.phase != ActorPhase::Exhausted {
            return Err(ActorError::UnexpectedPhase {
                actor: self.id,
                phase: self.phase,
                expected: ActorPhase::Exhausted,
            });
        }
        let queued = self
            .queue
            .pop_front()
            .ok_or(ActorError::NothingQueued(self.id))?;
        self.phase = ActorPhase::Playing;
        Ok(queued)
    }

    pub(crate) fn commit(&mut self, placement: Placement) {
        self.committed = placement;
    }

    /// Leaves `Playing` once the view reports the action finished.
    ///
    /// Dead actors stay dead; a completion for them is accepted and ignored.
    pub fn complete_action(&mut self) -> Result<(), ActorError> {
        match self.phase {
            ActorPhase::Dead => Ok(()),
            ActorPhase::Playing => {
                self.phase = if self.queue.is_empty() {
                    ActorPhase::Idle
                } else {
                    ActorPhase::Exhausted
                };
                Ok(())
            }
            phase => Err(ActorError::UnexpectedPhase {
                actor: self.id,
                phase,
                expected: ActorPhase::Playing,
            }),
        }
    }

    /// Subtracts `raw` (less defense when `apply_defense`) from hit points.
    ///
    /// A roll below defense comes out negative and restores hit points.
    /// Hit points have no floor; at or below zero the actor dies and drops
    /// its queue.
    pub fn deal_damage(&mut self, raw: i32, apply_defense: bool) -> DamageReport {
        let damage = if apply_defense {
            raw - self.attributes.defense
        } else {
            raw
        };
        self.attributes.hit_points -= damage;

        let killed = self.is_alive() && self.attributes.hit_points <= 0;
        if killed {
            self.die();
        }

        DamageReport { damage, killed }
    }

    fn die(&mut self) {
        self.phase = ActorPhase::Dead;
        self.queue.clear();
        self.legal_targets.clear();
        self.action_points = 0;
        self.preview = self.committed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Action;

    fn actor() -> Actor {
        Actor::new(
            ActorId(0),
            Placement::new(Position::new(1, 1), 0.0),
            Attributes::new(10, 2),
        )
    }

    fn queued(cost: u32) -> QueuedAction {
        QueuedAction {
            action: Action::Wait,
            cost,
        }
    }

    #[test]
    fn begin_round_adds_grant_and_resets_preview() {
        let mut actor = actor();
        actor.begin_round(3);
        assert_eq!(actor.action_points(), 3);
        assert_eq!(actor.phase(), ActorPhase::Idle);
        assert_eq!(actor.preview(), actor.committed());
    }

    #[test]
    fn begin_round_keeps_preview_of_undrained_queue() {
        let mut actor = actor();
        actor.begin_round(1);
        let ahead = Placement::new(Position::new(2, 1), 0.0);
        actor.enqueue(queued(1), ahead);
        assert_eq!(actor.phase(), ActorPhase::Exhausted);

        actor.begin_round(3);
        assert_eq!(actor.preview(), ahead);
        assert_eq!(actor.phase(), ActorPhase::Queuing);
        assert_eq!(actor.action_points(), 3);
    }

    #[test]
    fn end_round_only_when_budget_spent() {
        let mut actor = actor();
        actor.begin_round(2);
        assert!(!actor.end_round());

        let here = actor.preview();
        actor.enqueue(queued(2), here);
        assert!(actor.end_round());
        assert!(!actor.phase().accepts_input());
    }

    #[test]
    fn playback_cycles_between_playing_and_exhausted() {
        let mut actor = actor();
        actor.begin_round(2);
        let here = actor.preview();
        actor.enqueue(queued(1), here);
        actor.enqueue(queued(1), here);

        actor.pop_next().unwrap();
        assert_eq!(actor.phase(), ActorPhase::Playing);
        assert!(matches!(
            actor.pop_next(),
            Err(ActorError::UnexpectedPhase { .. })
        ));

        actor.complete_action().unwrap();
        assert_eq!(actor.phase(), ActorPhase::Exhausted);
        actor.pop_next().unwrap();
        actor.complete_action().unwrap();
        assert_eq!(actor.phase(), ActorPhase::Idle);
        assert!(actor.complete_action().is_err());
    }

    #[test]
    fn deal_damage_subtracts_defense_from_raw() {
        let mut actor = actor();
        assert_eq!(actor.deal_damage(5, true).damage, 3);
        assert_eq!(actor.attributes().hit_points, 7);
        assert_eq!(actor.deal_damage(4, false).damage, 4);
        assert_eq!(actor.attributes().hit_points, 3);
        assert!(actor.is_alive());
    }

    #[test]
    fn roll_below_defense_restores_hit_points() {
        let mut actor = Actor::new(
            ActorId(0),
            Placement::new(Position::new(0, 0), 0.0),
            Attributes::new(10, 5),
        );
        let report = actor.deal_damage(2, true);
        assert_eq!(report.damage, -3);
        assert!(!report.killed);
        assert_eq!(actor.attributes().hit_points, 13);
    }

    #[test]
    fn lethal_damage_kills_and_allows_negative_hit_points() {
        let mut actor = actor();
        actor.begin_round(1);
        let here = actor.preview();
        actor.enqueue(queued(1), here);

        let report = actor.deal_damage(15, false);
        assert!(report.killed);
        assert_eq!(actor.attributes().hit_points, -5);
        assert_eq!(actor.phase(), ActorPhase::Dead);
        assert!(!actor.has_queued());

        // Already dead: no second kill, still dead.
        assert!(!actor.deal_damage(1, false).killed);
        actor.begin_round(3);
        assert_eq!(actor.phase(), ActorPhase::Dead);
        assert_eq!(actor.action_points(), 0);
    }
}
