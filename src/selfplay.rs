// Self-play game loop
//
// Drives a Board with the reference Player: player move, then the
// environment spawns a tile, until no move is left or the move cap is hit.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::player::Player;

/// Final state of a finished game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSummary {
    pub game_id: u32,
    pub seed: u64,
    pub moves: u32,
    pub score: u64,
    pub max_tile: u32,
    pub won: bool,
    pub final_board: Board,
}

pub struct SelfPlay {
    player: Player,
    logger: DebugLogger,
}

impl SelfPlay {
    pub fn new(config: Config, logger: DebugLogger) -> Self {
        SelfPlay {
            player: Player::new(config),
            logger,
        }
    }

    /// Plays one full game from a seeded start
    pub fn play_game(&self, game_id: u32, seed: u64) -> GameSummary {
        let config = self.player.config();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut board = Board::empty();
        board.add_start_tiles(config.game.start_tiles, &mut rng);

        info!("Game {}: starting (seed {})", game_id, seed);

        let mut moves = 0;
        let mut score = 0;
        let mut won = false;

        while board.moves_available() && !config.game.move_limit_reached(moves) {
            let Some(decision) = self.player.choose_move(&board) else {
                break;
            };

            self.logger
                .log_move(game_id, moves, score, board.serialize(), decision.direction);

            let outcome = board.move_tiles(decision.direction);
            moves += 1;
            score += outcome.score;
            if outcome.won && !won {
                info!("Game {}: reached the winning tile on move {}", game_id, moves);
                won = true;
            }
            debug!(
                "Game {} move {}: {} (+{}, value {:.4})\n{}",
                game_id, moves, decision.direction, outcome.score, decision.value, board
            );

            if !board.player_turn() {
                board.computer_move(&mut rng);
            }
        }

        let max_tile = board.max_tile().unwrap_or(0);
        info!(
            "Game {}: finished after {} moves, score {}, max tile {}",
            game_id, moves, score, max_tile
        );

        GameSummary {
            game_id,
            seed,
            moves,
            score,
            max_tile,
            won: won || board.is_win(),
            final_board: board,
        }
    }
}
