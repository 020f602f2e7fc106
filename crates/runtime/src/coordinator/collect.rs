use game_core::{ActorError, ActorId, GameError, InputCommand, Position};

use super::TurnCoordinator;
use crate::api::{Result, TurnView};
use crate::events::InputEvent;

impl TurnCoordinator {
    /// One actor's collecting turn: grant points, then feed commands until
    /// the budget is spent.
    pub(super) async fn collect_turn(&mut self, round: u32, actor: ActorId) -> Result<()> {
        let grant = self.config.game.action_points_per_round;
        self.roster.start_round(actor, grant, &self.map)?;

        let view = self.turn_view(round, actor)?;
        tracing::debug!(
            round,
            %actor,
            action_points = view.action_points,
            "turn started"
        );
        self.events.publish(InputEvent::TurnStarted {
            round,
            actor,
            action_points: view.action_points,
        });
        self.publish_legal_targets(actor, &view);

        let mut view = view;
        while !self.roster.end_round(actor)? {
            let command = self.input.next_command(actor, &view).await?;
            let result = match command {
                InputCommand::Target { x, y } => {
                    self.roster
                        .attempt_action(actor, Position::new(x, y), &self.map)
                }
                InputCommand::Wait => self.roster.attempt_wait(actor, &self.map),
            };

            match result {
                Ok(queued) => {
                    view = self.turn_view(round, actor)?;
                    tracing::debug!(
                        %actor,
                        action = queued.action.as_snake_case(),
                        cost = queued.cost,
                        remaining = view.action_points,
                        "action queued"
                    );
                    self.events.publish(InputEvent::ActionQueued {
                        actor,
                        queued,
                        remaining: view.action_points,
                    });
                    self.publish_legal_targets(actor, &view);
                }
                Err(reason) => {
                    tracing::debug!(
                        %actor,
                        ?command,
                        code = reason.error_code(),
                        severity = reason.severity().as_str(),
                        %reason,
                        "action rejected"
                    );
                    self.events.publish(InputEvent::ActionRejected {
                        actor,
                        command,
                        reason,
                    });
                }
            }
        }

        tracing::debug!(round, %actor, "turn ended");
        self.events.publish(InputEvent::TurnEnded { round, actor });
        Ok(())
    }

    fn turn_view(&self, round: u32, actor: ActorId) -> Result<TurnView> {
        let state = self
            .roster
            .get(actor)
            .ok_or(ActorError::UnknownActor(actor))?;
        Ok(TurnView {
            round,
            actor,
            action_points: state.action_points(),
            committed: state.committed(),
            preview: state.preview(),
            legal_targets: state.legal_targets().clone(),
        })
    }

    fn publish_legal_targets(&self, actor: ActorId, view: &TurnView) {
        self.events.publish(InputEvent::LegalTargets {
            actor,
            targets: view.legal_targets.iter().copied().collect(),
        });
    }
}
