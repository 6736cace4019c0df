use log::{error, info};
use std::env;
use std::sync::Arc;

use grid_2048::config::Config;
use grid_2048::debug_logger::DebugLogger;
use grid_2048::selfplay::{GameSummary, SelfPlay};

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting 2048 self-play...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let base_seed = config.game.seed.unwrap_or_else(rand::random);
    let games = config.game.games;

    let selfplay = Arc::new(SelfPlay::new(config, logger.clone()));
    let mut summaries: Vec<GameSummary> = Vec::new();

    for game_id in 0..games {
        let selfplay = selfplay.clone();
        let seed = base_seed.wrapping_add(u64::from(game_id));

        // The game loop is CPU-bound; keep it off the async workers
        match tokio::task::spawn_blocking(move || selfplay.play_game(game_id, seed)).await {
            Ok(summary) => {
                println!("{}", summary.final_board);
                summaries.push(summary);
            }
            Err(e) => error!("Game {} failed: {}", game_id, e),
        }
    }

    logger.drain().await;

    if summaries.is_empty() {
        return;
    }

    let wins = summaries.iter().filter(|s| s.won).count();
    let best = summaries.iter().map(|s| s.score).max().unwrap_or(0);
    let avg = summaries.iter().map(|s| s.score as f64).sum::<f64>() / summaries.len() as f64;

    println!("Games: {}, Wins: {}", summaries.len(), wins);
    println!("Best score: {}, Average score: {:.1}", best, avg);
    for summary in &summaries {
        println!(
            "  game {:>3} (seed {}): {} moves, score {}, max tile {}",
            summary.game_id, summary.seed, summary.moves, summary.score, summary.max_tile
        );
    }
}
