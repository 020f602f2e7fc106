//! Asynchronous abstraction for sourcing actor input.
//!
//! During an actor's collecting turn the coordinator repeatedly asks an
//! [`InputProvider`] for the next command until the actor's budget is spent.
//! Implementations range from a UI forwarding pointer clicks to scripted
//! fixtures for headless matches.
use std::collections::{BTreeSet, HashMap, VecDeque};

use async_trait::async_trait;
use game_content::InputScript;
use game_core::{ActorId, InputCommand, Placement, Position};
use tokio::sync::{Mutex, mpsc};

use super::errors::{Result, RuntimeError};

/// What the input layer may see while choosing a command.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnView {
    pub round: u32,
    pub actor: ActorId,
    pub action_points: u32,
    pub committed: Placement,
    pub preview: Placement,
    /// Tiles a `Target` command would currently succeed on.
    pub legal_targets: BTreeSet<Position>,
}

/// Trait for providing input commands to an actor during its turn.
///
/// Rejected commands are reported on the event bus and the provider is
/// asked again, so an implementation must eventually produce a legal command
/// (`InputCommand::Wait` always is while the actor has points left).
#[async_trait]
pub trait InputProvider: Send + Sync {
    async fn next_command(&self, actor: ActorId, view: &TurnView) -> Result<InputCommand>;
}

/// Always waits. Drains every budget one point at a time.
pub struct WaitInput;

#[async_trait]
impl InputProvider for WaitInput {
    async fn next_command(&self, _actor: ActorId, _view: &TurnView) -> Result<InputCommand> {
        Ok(InputCommand::Wait)
    }
}

/// What a [`ScriptedInput`] does once an actor's script is used up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptEnd {
    /// Keep the match going by waiting.
    #[default]
    Wait,
    /// Fail with [`RuntimeError::InputExhausted`].
    Fail,
}

/// Replays per-actor command lists in order.
pub struct ScriptedInput {
    scripts: Mutex<HashMap<ActorId, VecDeque<InputCommand>>>,
    on_end: ScriptEnd,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            on_end: ScriptEnd::default(),
        }
    }

    pub fn from_script(script: &InputScript) -> Self {
        let scripts = script
            .actors
            .iter()
            .map(|(&index, commands)| (ActorId(index), commands.iter().copied().collect()))
            .collect();
        Self {
            scripts: Mutex::new(scripts),
            on_end: ScriptEnd::default(),
        }
    }

    pub fn with_commands(
        mut self,
        actor: ActorId,
        commands: impl IntoIterator<Item = InputCommand>,
    ) -> Self {
        self.scripts
            .get_mut()
            .entry(actor)
            .or_default()
            .extend(commands);
        self
    }

    pub fn on_end(mut self, on_end: ScriptEnd) -> Self {
        self.on_end = on_end;
        self
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn next_command(&self, actor: ActorId, _view: &TurnView) -> Result<InputCommand> {
        let mut scripts = self.scripts.lock().await;
        match scripts.get_mut(&actor).and_then(VecDeque::pop_front) {
            Some(command) => Ok(command),
            None => match self.on_end {
                ScriptEnd::Wait => Ok(InputCommand::Wait),
                ScriptEnd::Fail => Err(RuntimeError::InputExhausted { actor }),
            },
        }
    }
}

/// Forwards commands pushed from another task, e.g. a UI event loop.
///
/// The turn view for the acting actor is published first so the sender can
/// render affordances before choosing.
pub struct ChannelInput {
    commands: Mutex<mpsc::Receiver<InputCommand>>,
    views: mpsc::Sender<TurnView>,
}

impl ChannelInput {
    /// Returns the provider plus the sender/receiver pair the UI side holds.
    pub fn channel(buffer: usize) -> (Self, mpsc::Sender<InputCommand>, mpsc::Receiver<TurnView>) {
        let (command_tx, command_rx) = mpsc::channel(buffer);
        let (view_tx, view_rx) = mpsc::channel(buffer);
        let provider = Self {
            commands: Mutex::new(command_rx),
            views: view_tx,
        };
        (provider, command_tx, view_rx)
    }
}

#[async_trait]
impl InputProvider for ChannelInput {
    async fn next_command(&self, _actor: ActorId, view: &TurnView) -> Result<InputCommand> {
        self.views
            .send(view.clone())
            .await
            .map_err(|_| RuntimeError::InputClosed)?;
        self.commands
            .lock()
            .await
            .recv()
            .await
            .ok_or(RuntimeError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(actor: ActorId) -> TurnView {
        let here = Placement::new(Position::ORIGIN, 0.0);
        TurnView {
            round: 1,
            actor,
            action_points: 3,
            committed: here,
            preview: here,
            legal_targets: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn scripted_input_replays_in_order_then_waits() {
        let actor = ActorId(0);
        let input = ScriptedInput::new().with_commands(
            actor,
            [InputCommand::Target { x: 1, y: 0 }, InputCommand::Wait],
        );

        let view = view(actor);
        assert_eq!(
            input.next_command(actor, &view).await.unwrap(),
            InputCommand::Target { x: 1, y: 0 }
        );
        assert_eq!(input.next_command(actor, &view).await.unwrap(), InputCommand::Wait);
        assert_eq!(input.next_command(actor, &view).await.unwrap(), InputCommand::Wait);
    }

    #[tokio::test]
    async fn strict_script_reports_exhaustion() {
        let actor = ActorId(4);
        let input = ScriptedInput::new().on_end(ScriptEnd::Fail);
        let err = input.next_command(actor, &view(actor)).await.unwrap_err();
        assert!(matches!(err, RuntimeError::InputExhausted { actor: a } if a == actor));
    }

    #[tokio::test]
    async fn channel_input_publishes_view_and_forwards_command() {
        let (input, commands, mut views) = ChannelInput::channel(4);
        let actor = ActorId(1);

        commands.send(InputCommand::Wait).await.unwrap();
        let command = input.next_command(actor, &view(actor)).await.unwrap();
        assert_eq!(command, InputCommand::Wait);
        assert_eq!(views.recv().await.unwrap().actor, actor);

        drop(commands);
        assert!(matches!(
            input.next_command(actor, &view(actor)).await,
            Err(RuntimeError::InputClosed)
        ));
    }
}
