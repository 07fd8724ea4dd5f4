//! # VoxelGame
//!
//! Usage: `voxelgame [config.toml]`
//!
//! Without an argument the default configuration is used.

use std::process::ExitCode;

use tracing::{error, info};
use voxelgame::{init_logging, EngineResult, FrameStats, Game, GameConfig};

fn main() -> ExitCode {
    let config = match std::env::args_os().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("voxelgame: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    if let Err(err) = init_logging(&config.log) {
        eprintln!("voxelgame: {err}");
        return ExitCode::FAILURE;
    }

    let mut game = Game::new(config);
    let result = run(&mut game);
    game.destroy();

    match result {
        Ok(stats) => {
            info!(frames = stats.frames, "exiting");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "game failed");
            ExitCode::FAILURE
        }
    }
}

fn run(game: &mut Game) -> EngineResult<FrameStats> {
    game.initialize()?;
    game.start_game()
}
