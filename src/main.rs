//! Neon Arcade headless runner
//!
//! Drives one of the games with its demo bot for a fixed number of frames,
//! restarting after every game over, and reports the outcome.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use neon_arcade::consts::STEP_MS;
use neon_arcade::input::{InputSource, PaddleBot, ShipBot};
use neon_arcade::sim::{Arkanoid, Shooter, World};
use neon_arcade::store::{JsonFileStore, MemoryScoreStore, ScoreCommitter, ScoreStore};
use neon_arcade::{GameConfig, GameLoop, GameSession, logging};

/// How long to wait for in-flight score commits before exiting
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Game {
    Arkanoid,
    Shooter,
}

/// Neon brick breaker and space shooter, played headless by demo bots
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Which game to run
    #[arg(long, value_enum, default_value_t = Game::Arkanoid)]
    game: Game,
    /// Number of host frames to simulate
    #[arg(long, value_name = "COUNT", default_value_t = 3600)]
    frames: u64,
    /// RNG seed (defaults to a random one)
    #[arg(long)]
    seed: Option<u64>,
    /// JSON game configuration
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// JSON best-score file (in-memory store when omitted)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
    /// Signed-in user id; scores are not saved without one
    #[arg(long)]
    user: Option<String>,
    /// Host frame interval in milliseconds
    #[arg(long, value_name = "MILLISECONDS", default_value_t = STEP_MS)]
    frame_ms: f64,
    /// Print the final session snapshot as JSON
    #[arg(long)]
    snapshot: bool,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> GameConfig {
    let Some(path) = &args.config else {
        return GameConfig::default();
    };
    GameConfig::load(path).unwrap_or_else(|e| {
        log::warn!("Using default configuration: {e}");
        GameConfig::default()
    })
}

fn committer(args: &Args) -> ScoreCommitter {
    let store: Arc<dyn ScoreStore> = match &args.store {
        Some(path) => Arc::new(JsonFileStore::new(path)),
        None => Arc::new(MemoryScoreStore::new()),
    };
    ScoreCommitter::new(store, args.user.clone())
}

/// Play `args.frames` frames, restarting after each game over
fn run<W, I>(mut game: GameLoop<W, I>, args: &Args)
where
    W: World + Serialize,
    I: InputSource<W>,
{
    let mut games = 1u32;
    for frame in 0..=args.frames {
        game.frame(frame as f64 * args.frame_ms);
        if !game.session.is_running() && frame < args.frames {
            games += 1;
            game.session.restart();
        }
    }

    let pending = game.session.flush_commits(FLUSH_TIMEOUT);
    if pending > 0 {
        log::warn!("{pending} score commit(s) still in flight at exit");
    }

    let session = &game.session;
    log::info!(
        "{} games played; final score {}, best {}",
        games,
        session.score(),
        session.best_score()
    );

    if args.snapshot {
        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {e}"),
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = load_config(&args);
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Neon Arcade starting {:?} with seed {seed}", args.game);

    match args.game {
        Game::Arkanoid => {
            let session = GameSession::<Arkanoid>::new(&config, seed, committer(&args));
            run(GameLoop::new(session, PaddleBot, &config.timing), &args);
        }
        Game::Shooter => {
            let session = GameSession::<Shooter>::new(&config, seed, committer(&args));
            let bot = ShipBot::new(config.timing.step_ms);
            run(GameLoop::new(session, bot, &config.timing), &args);
        }
    }
}
