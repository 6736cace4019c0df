// Replay module for analyzing logged games and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Rebuild each logged board from its snapshot and rerun the player
// 3. Compare logged vs replayed moves
// 4. Generate detailed analysis reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::board::Board;
use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::heuristics;
use crate::player::Player;
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_id: u32,
    pub turn: u32,
    pub original_move: Direction,
    /// None when the rebuilt board has no legal move
    pub replayed_move: Option<Direction>,
    pub matches: bool,
    pub replayed_value: f64,
    pub smoothness: f64,
    pub monotonicity2: f64,
    pub islands: u32,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    player: Player,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            player: Player::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying game {} turn {}...", entry.game_id, entry.turn);
        }

        let original_move: Direction = entry.chosen_move.parse()?;
        let board = Board::from_snapshot(&entry.board)
            .map_err(|e| format!("Turn {}: {}", entry.turn, e))?;

        let start_time = Instant::now();
        let decision = self.player.choose_move(&board);
        let computation_time_us = start_time.elapsed().as_micros();

        let replayed_move = decision.map(|d| d.direction);
        let matches = replayed_move == Some(original_move);

        let result = ReplayResult {
            game_id: entry.game_id,
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            replayed_value: decision.map_or(f64::NEG_INFINITY, |d| d.value),
            smoothness: heuristics::smoothness(&board),
            monotonicity2: heuristics::monotonicity2(&board),
            islands: heuristics::islands(&board),
            computation_time_us,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: MATCH - {} (value: {:.4}, time: {}us)",
                    entry.turn, original_move, result.replayed_value, computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: MISMATCH - Original: {}, Replayed: {} (value: {:.4}, time: {}us)",
                    entry.turn,
                    original_move,
                    Self::describe(replayed_move),
                    result.replayed_value,
                    computation_time_us
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let count = results.len() as f64;
            let avg_time =
                results.iter().map(|r| r.computation_time_us as f64).sum::<f64>() / count;
            let avg_smoothness = results.iter().map(|r| r.smoothness).sum::<f64>() / count;
            let avg_islands = results.iter().map(|r| f64::from(r.islands)).sum::<f64>() / count;

            println!("Average Smoothness:         {:.2}", avg_smoothness);
            println!("Average Islands:            {:.2}", avg_islands);
            println!("Average Computation Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Game {} turn {}: {} → {} (value: {:.4}, monotonicity2: {:.2})",
                    result.game_id,
                    result.turn,
                    result.original_move,
                    Self::describe(result.replayed_move),
                    result.replayed_value,
                    result.monotonicity2
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move: Direction = entry.chosen_move.parse()?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }

    fn describe(direction: Option<Direction>) -> &'static str {
        direction.map_or("none", |d| d.as_str())
    }
}
