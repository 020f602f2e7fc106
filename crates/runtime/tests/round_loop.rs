use game_core::{
    Action, ActionOutcome, ActorPhase, Attributes, Facing, GameConfig, InputCommand, MapLayers,
    Position, TileAction, TileMap, TileObject,
};
use runtime::{
    Event, InputEvent, InstantView, PlaybackEvent, RuntimeConfig, RuntimeError, ScriptedInput,
    Topic, TurnCoordinator, WaitInput,
};
use tokio::sync::broadcast;

fn flat_map(width: u32, height: u32) -> TileMap {
    let layers = MapLayers::uniform(width, height, 0.0, TileObject::new(TileAction::Walk))
        .with_object(0, 0, TileObject::spawn());
    TileMap::from_layers(&layers).unwrap()
}

fn seeded() -> RuntimeConfig {
    RuntimeConfig {
        rng_seed: Some(42),
        ..RuntimeConfig::default()
    }
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn walk_then_attack_plays_out_over_two_ticks() {
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(10, 10))
        .input(ScriptedInput::new().with_commands(
            game_core::ActorId(0),
            [
                InputCommand::Target { x: 1, y: 0 },
                InputCommand::Target { x: 2, y: 0 },
            ],
        ))
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .spawn_at(Position::new(2, 0))
        .build()
        .unwrap();
    let mut input = coordinator.subscribe(Topic::Input);
    let mut playback = coordinator.subscribe(Topic::Playback);

    let summary = coordinator.run_round().await.unwrap().unwrap();
    assert_eq!(summary.round, 1);
    assert_eq!(summary.ticks_played, 3);

    let remaining: Vec<u32> = drain(&mut input)
        .into_iter()
        .filter_map(|event| match event {
            Event::Input(InputEvent::ActionQueued {
                actor, remaining, ..
            }) if actor.0 == 0 => Some(remaining),
            _ => None,
        })
        .collect();
    assert_eq!(remaining, vec![2, 1, 0]);

    let started: Vec<(u32, Action)> = drain(&mut playback)
        .into_iter()
        .filter_map(|event| match event {
            Event::Playback(PlaybackEvent::ActionStarted { tick, played, .. })
                if played.actor.0 == 0 =>
            {
                Some((tick, played.action))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        started,
        vec![
            (1, Action::Move { dx: 1, dy: 0 }),
            (
                2,
                Action::MeleeAttack {
                    target: game_core::ActorId(1),
                    facing: Facing::Right
                }
            ),
            (3, Action::Wait),
        ]
    );

    let attacker = coordinator.actor(game_core::ActorId(0)).unwrap();
    assert_eq!(attacker.committed().position, Position::new(1, 0));
    assert_eq!(attacker.phase(), ActorPhase::Idle);

    let defender = coordinator.actor(game_core::ActorId(1)).unwrap();
    let hit_points = defender.attributes().hit_points;
    assert!(hit_points <= GameConfig::DEFAULT_HIT_POINTS);
    assert!(hit_points > GameConfig::DEFAULT_HIT_POINTS - 10);
}

#[tokio::test]
async fn turns_follow_registration_order_and_skip_the_dead() {
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(6, 6))
        .input(WaitInput)
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .spawn_with(Position::new(2, 2), Attributes::new(0, 0))
        .spawn_at(Position::new(4, 4))
        .build()
        .unwrap();
    let mut input = coordinator.subscribe(Topic::Input);

    for _ in 0..2 {
        let summary = coordinator.run_round().await.unwrap().unwrap();
        assert_eq!(summary.collected.len(), 2);
    }

    let turns: Vec<u32> = drain(&mut input)
        .into_iter()
        .filter_map(|event| match event {
            Event::Input(InputEvent::TurnStarted { actor, .. }) => Some(actor.0),
            _ => None,
        })
        .collect();
    assert_eq!(turns, vec![0, 2, 0, 2]);
    assert_eq!(coordinator.round(), 2);
}

#[tokio::test]
async fn rejected_commands_leave_the_budget_untouched() {
    let actor = game_core::ActorId(0);
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(5, 5))
        .input(ScriptedInput::new().with_commands(
            actor,
            [
                InputCommand::Target { x: 3, y: 3 },
                InputCommand::Target { x: -1, y: 0 },
                InputCommand::Target { x: 1, y: 1 },
            ],
        ))
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .build()
        .unwrap();
    let mut input = coordinator.subscribe(Topic::Input);

    coordinator.run_round().await.unwrap();

    let events = drain(&mut input);
    let rejected = events
        .iter()
        .filter(|event| matches!(event, Event::Input(InputEvent::ActionRejected { .. })))
        .count();
    assert_eq!(rejected, 2);

    let first_queued = events.iter().find_map(|event| match event {
        Event::Input(InputEvent::ActionQueued { remaining, .. }) => Some(*remaining),
        _ => None,
    });
    assert_eq!(first_queued, Some(2));
    assert_eq!(
        coordinator.actor(actor).unwrap().committed().position,
        Position::new(1, 1)
    );
}

#[tokio::test]
async fn lethal_hit_removes_the_victim_from_later_rounds() {
    let attacker = game_core::ActorId(0);
    let victim = game_core::ActorId(1);
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(4, 4))
        .input(
            ScriptedInput::new()
                .with_commands(attacker, [InputCommand::Target { x: 1, y: 0 }])
                .with_commands(victim, [InputCommand::Target { x: 0, y: 0 }]),
        )
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        // Negative defense turns any roll, even zero, into a lethal hit.
        .spawn_with(Position::new(1, 0), Attributes::new(1, -10))
        .build()
        .unwrap();
    let mut playback = coordinator.subscribe(Topic::Playback);

    let summary = coordinator.run(10).await.unwrap();
    assert_eq!(summary.rounds_played, 1);
    assert_eq!(summary.survivors, vec![attacker]);
    assert!(coordinator.is_over());

    let events = drain(&mut playback);
    let died_at = events
        .iter()
        .position(|event| {
            matches!(
                event,
                Event::Playback(PlaybackEvent::ActorDied { actor, killer, tick: 1, .. })
                    if *actor == victim && *killer == attacker
            )
        })
        .unwrap();
    let blow_at = events
        .iter()
        .position(|event| {
            matches!(
                event,
                Event::Playback(PlaybackEvent::ActionStarted { played, .. })
                    if played.actor == attacker
            )
        })
        .unwrap();
    // The blow is announced before the death it causes.
    assert!(blow_at < died_at);
    // The victim's queued counter-attack never ran.
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::Playback(PlaybackEvent::ActionStarted { played, .. }) if played.actor == victim
    )));

    let attacker_state = coordinator.actor(attacker).unwrap();
    assert_eq!(
        attacker_state.attributes().hit_points,
        GameConfig::DEFAULT_HIT_POINTS
    );
    let victim_state = coordinator.actor(victim).unwrap();
    assert_eq!(victim_state.phase(), ActorPhase::Dead);
    assert_eq!(victim_state.committed().position, Position::new(1, 0));
}

#[tokio::test]
async fn corpse_keeps_blocking_its_tile() {
    let attacker = game_core::ActorId(0);
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(4, 4))
        .input(ScriptedInput::new().with_commands(
            attacker,
            [
                InputCommand::Target { x: 1, y: 0 },
                InputCommand::Wait,
                InputCommand::Wait,
                InputCommand::Target { x: 1, y: 0 },
            ],
        ))
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .spawn_with(Position::new(1, 0), Attributes::new(1, -10))
        .spawn_with(Position::new(3, 3), Attributes::new(50, 0))
        .build()
        .unwrap();
    let mut input = coordinator.subscribe(Topic::Input);

    coordinator.run_round().await.unwrap();
    coordinator.run_round().await.unwrap();

    let blocked = drain(&mut input).into_iter().any(|event| {
        matches!(
            event,
            Event::Input(InputEvent::ActionRejected {
                reason: game_core::IllegalAction::Blocked { .. },
                ..
            })
        )
    });
    assert!(blocked);
    assert_eq!(
        coordinator.actor(attacker).unwrap().committed().position,
        Position::new(0, 0)
    );
}

#[tokio::test]
async fn empty_roster_short_circuits() {
    let mut coordinator = TurnCoordinator::builder()
        .map(flat_map(3, 3))
        .input(WaitInput)
        .view(InstantView)
        .spawn_with(Position::new(1, 1), Attributes::new(0, 0))
        .build()
        .unwrap();

    assert!(coordinator.run_round().await.unwrap().is_none());
    assert_eq!(coordinator.round(), 0);

    let summary = coordinator.run(5).await.unwrap();
    assert_eq!(summary.rounds_played, 0);
    assert!(summary.survivors.is_empty());
}

#[tokio::test]
async fn lone_actor_plays_without_peers() {
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(3, 3))
        .input(WaitInput)
        .view(InstantView)
        .spawn_random(1)
        .build()
        .unwrap();

    let summary = coordinator.run(2).await.unwrap();
    assert_eq!(summary.rounds_played, 2);
    assert_eq!(summary.survivors.len(), 1);
    assert_eq!(coordinator.actor(game_core::ActorId(0)).unwrap().queue_len(), 0);
}

#[tokio::test]
async fn elevation_toll_shortens_the_queue() {
    let layers = MapLayers::uniform(4, 1, 0.0, TileObject::new(TileAction::Walk))
        .with_object(0, 0, TileObject::spawn())
        .with_level(1, 0, 2.0);
    let actor = game_core::ActorId(0);
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(TileMap::from_layers(&layers).unwrap())
        .input(ScriptedInput::new().with_commands(actor, [InputCommand::Target { x: 1, y: 0 }]))
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .build()
        .unwrap();

    let summary = coordinator.run_round().await.unwrap().unwrap();
    assert_eq!(summary.ticks_played, 1);
    let state = coordinator.actor(actor).unwrap();
    assert_eq!(state.committed().position, Position::new(1, 0));
    assert_eq!(state.committed().elevation, 2.0);
}

#[tokio::test]
async fn played_outcome_reports_the_move() {
    let actor = game_core::ActorId(0);
    let mut coordinator = TurnCoordinator::builder()
        .config(seeded())
        .map(flat_map(3, 3))
        .input(ScriptedInput::new().with_commands(actor, [InputCommand::Target { x: 1, y: 1 }]))
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .build()
        .unwrap();
    let mut playback = coordinator.subscribe(Topic::Playback);

    coordinator.run_round().await.unwrap();

    let moved = drain(&mut playback).into_iter().find_map(|event| match event {
        Event::Playback(PlaybackEvent::ActionStarted { played, .. }) => Some(played.outcome),
        _ => None,
    });
    let Some(ActionOutcome::Moved { from, to }) = moved else {
        panic!("expected a move, got {moved:?}");
    };
    assert_eq!(from.position, Position::new(0, 0));
    assert_eq!(to.position, Position::new(1, 1));
}

#[test]
fn builder_requires_collaborators() {
    let missing_map = TurnCoordinator::builder()
        .input(WaitInput)
        .view(InstantView)
        .build();
    assert!(matches!(missing_map, Err(RuntimeError::MissingMap)));

    let missing_view = TurnCoordinator::builder()
        .map(flat_map(2, 2))
        .input(WaitInput)
        .build();
    assert!(matches!(missing_view, Err(RuntimeError::MissingView)));

    let no_spawns = TurnCoordinator::builder()
        .map(TileMap::build(2, 2))
        .input(WaitInput)
        .view(InstantView)
        .spawn_random(1)
        .build();
    assert!(matches!(
        no_spawns,
        Err(RuntimeError::Map(game_core::MapError::NoSpawnPoints))
    ));
}

#[tokio::test]
async fn zero_event_buffer_is_usable() {
    let mut coordinator = TurnCoordinator::builder()
        .config(RuntimeConfig {
            event_buffer_size: 0,
            ..seeded()
        })
        .map(flat_map(3, 3))
        .input(WaitInput)
        .view(InstantView)
        .spawn_at(Position::new(0, 0))
        .build()
        .unwrap();
    let mut rounds = coordinator.subscribe(Topic::Round);

    let summary = coordinator.run_round().await.unwrap().unwrap();
    assert_eq!(summary.ticks_played, 3);

    // A one-slot channel keeps only the newest event.
    let latest = loop {
        match rounds.recv().await {
            Ok(event) => break event,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(err) => panic!("round topic closed: {err}"),
        }
    };
    assert!(matches!(
        latest,
        Event::Round(runtime::RoundEvent::RoundEnded { round: 1, .. })
    ));
}
