//! Headless match driver.
//!
//! Loads an arena, rules and an optional input script, then plays rounds with
//! a timed stand-in for the animation layer while logging the match.
mod config;
mod report;
mod view;

use std::path::Path;

use anyhow::{Context, Result};
use config::CliConfig;
use game_content::{ConfigLoader, InputScript, MapLoader, ScriptLoader};
use game_core::{GameConfig, GameError};
use runtime::{RuntimeConfig, ScriptedInput, TurnCoordinator};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use view::TimedView;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = CliConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let map = MapLoader::load(&config.map_path)?;
    let game = match &config.game_config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => GameConfig::default(),
    };
    let script = match &config.script_path {
        Some(path) => ScriptLoader::load(path)?,
        None => InputScript::default(),
    };
    tracing::info!(
        map = %config.map_path.display(),
        width = map.dimensions().width,
        height = map.dimensions().height,
        spawns = map.spawn_points().len(),
        "arena loaded"
    );

    let runtime_config = RuntimeConfig {
        game,
        stall_timeout: config.stall_timeout,
        rng_seed: config.seed,
        ..RuntimeConfig::default()
    };

    let mut builder = TurnCoordinator::builder()
        .config(runtime_config)
        .map(map)
        .input(ScriptedInput::from_script(&script))
        .view(TimedView::new(config.animation));
    builder = if script.spawns.is_empty() {
        builder.spawn_random(config.actors)
    } else {
        script
            .spawns
            .iter()
            .fold(builder, |builder, &position| builder.spawn_at(position))
    };
    let mut coordinator = builder.build().context("failed to set up the match")?;

    let reporters = report::spawn(coordinator.event_bus());
    let summary = coordinator.run(config.max_rounds).await.inspect_err(|err| {
        tracing::error!(
            code = err.error_code(),
            severity = err.severity().as_str(),
            "match aborted: {err}"
        );
    })?;

    // Dropping the coordinator closes the bus so the reporters drain and exit.
    drop(coordinator);
    for reporter in reporters {
        reporter.await?;
    }

    match summary.survivors.as_slice() {
        [] => println!("No one left standing after {} rounds.", summary.rounds_played),
        [winner] => println!("{winner} wins after {} rounds.", summary.rounds_played),
        survivors => println!(
            "{} actors still standing after {} rounds.",
            survivors.len(),
            summary.rounds_played
        ),
    }

    Ok(())
}

/// Logs to stderr, and to `brawl.log` in `log_dir` when one is given.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "brawl.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
