//! Headless self-play runner (default binary).
//!
//! Plays seeded games with a fixed direction priority and logs each outcome.
//! Settings come from the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TILES_SEED` | 1 | Seed of the first game (later games use seed + n) |
//! | `TILES_GAMES` | 1 | Number of games to play |
//! | `TILES_ROWS` | 4 | Board rows |
//! | `TILES_COLUMNS` | 4 | Board columns |
//! | `TILES_TARGET_RANK` | 11 | Winning rank, `0` to play until stuck |
//! | `RUST_LOG` | `info` | Log filter |

use std::str::FromStr;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tiles::core::{Engine, GameConfig};
use tiles::types::{
    rank_value, Direction, GameStatus, DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_TARGET_RANK,
};

/// Direction preference: keep the big tiles packed into the bottom-left corner.
const PRIORITY: [Direction; 4] = [
    Direction::Down,
    Direction::Left,
    Direction::Right,
    Direction::Up,
];

#[derive(Debug, Clone, Copy)]
struct SimConfig {
    seed: u32,
    games: u32,
    game: GameConfig,
}

impl SimConfig {
    fn from_env() -> Result<Self> {
        let target_rank: u8 = env_or("TILES_TARGET_RANK", DEFAULT_TARGET_RANK)?;
        let game = GameConfig::with_dimensions(
            env_or("TILES_ROWS", DEFAULT_ROWS)?,
            env_or("TILES_COLUMNS", DEFAULT_COLUMNS)?,
        )
        .target_rank((target_rank > 0).then_some(target_rank));
        game.validate()?;

        Ok(Self {
            seed: env_or("TILES_SEED", 1)?,
            games: env_or("TILES_GAMES", 1)?,
            game,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value {raw:?}")),
        Err(_) => Ok(default),
    }
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Play one game to the end and return the final engine
fn play(config: GameConfig, seed: u32) -> Result<Engine> {
    let mut engine = Engine::with_config(config, seed)?;

    while !engine.is_terminal() {
        match PRIORITY.into_iter().find(|&d| engine.can_move(d)) {
            Some(direction) => {
                engine.apply_move(direction);
            }
            // Let the engine record the loss.
            None => {
                engine.apply_move(PRIORITY[0]);
            }
        }
    }

    Ok(engine)
}

fn main() -> Result<()> {
    setup_logging();
    let sim = SimConfig::from_env()?;
    tracing::info!(?sim, "starting self-play");

    let mut wins = 0u32;
    let mut best_score = 0u64;

    for n in 0..sim.games {
        let seed = sim.seed.wrapping_add(n);
        let engine = play(sim.game, seed)?;

        if engine.status() == GameStatus::Won {
            wins += 1;
        }
        best_score = best_score.max(engine.score());

        tracing::info!(
            seed,
            status = %engine.status(),
            score = engine.score(),
            moves = engine.moves(),
            max_value = engine.board().max_rank().map_or(0, rank_value),
            "game finished"
        );
        tracing::debug!("final board\n{}", engine.board());
        if tracing::enabled!(tracing::Level::DEBUG) {
            let save = serde_json::to_string(&engine.to_saved()).context("encoding save")?;
            tracing::debug!(%save, "final save");
        }
    }

    tracing::info!(games = sim.games, wins, best_score, "self-play done");
    Ok(())
}
