// Library exports for the 2048 grid engine
// The board engine and heuristics are the core; the player, self-play loop,
// debug logger and replay engine are the drivers built on top of them.

pub mod board;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod heuristics;
pub mod player;
pub mod replay;
pub mod selfplay;
pub mod types;
