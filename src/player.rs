// Reference player: one-ply greedy move selection
//
// Each direction is simulated on its own clone of the board and the
// resulting position is scored with the weighted heuristics. Clones share
// nothing with the source, so candidates can be evaluated in parallel.

use log::debug;
use rayon::prelude::*;

use crate::board::Board;
use crate::config::Config;
use crate::heuristics;
use crate::types::{Direction, MoveOutcome};

/// Chosen move with its evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub direction: Direction,
    pub value: f64,
    pub outcome: MoveOutcome,
}

pub struct Player {
    config: Config,
}

impl Player {
    pub fn new(config: Config) -> Self {
        Player { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Simulates `direction` on a clone and scores the result; None if nothing moves
    pub fn evaluate_move(&self, board: &Board, direction: Direction) -> Option<Decision> {
        let mut candidate = board.clone();
        let outcome = candidate.move_tiles(direction);
        if !outcome.moved {
            return None;
        }

        Some(Decision {
            direction,
            value: heuristics::evaluate(&candidate, &self.config.weights),
            outcome,
        })
    }

    /// Picks the direction with the best evaluation
    ///
    /// Ties go to the earlier direction in up, right, down, left order.
    /// Returns None when no direction changes the board.
    pub fn choose_move(&self, board: &Board) -> Option<Decision> {
        let directions = Direction::all();
        let candidates: Vec<Option<Decision>> = if self.config.parallel.enabled {
            directions
                .par_iter()
                .map(|&dir| self.evaluate_move(board, dir))
                .collect()
        } else {
            directions
                .iter()
                .map(|&dir| self.evaluate_move(board, dir))
                .collect()
        };

        let mut best: Option<Decision> = None;
        for decision in candidates.into_iter().flatten() {
            debug!(
                "Candidate {}: value {:.4}, merge score {}",
                decision.direction, decision.value, decision.outcome.score
            );
            match best {
                Some(current) if current.value >= decision.value => {}
                _ => best = Some(decision),
            }
        }

        best
    }
}
