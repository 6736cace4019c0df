// Debug logging module for asynchronous turn logging
//
// Fire-and-forget async logging so the game loop never waits on disk.
// Each turn's board (before the move) and the chosen move are written
// as one line of a JSONL file.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::types::{BoardSnapshot, Direction};

/// A single debug log entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub game_id: u32,
    pub turn: u32,
    pub chosen_move: String,
    /// Score accumulated before this turn's move
    pub score: u64,
    pub board: BoardSnapshot,
    pub timestamp: String,
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    /// Spawned writes not yet joined; dropping the last clone aborts them
    pending: Arc<parking_lot::Mutex<JoinSet<()>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    pending: Arc::new(parking_lot::Mutex::new(JoinSet::new())),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            pending: Arc::new(parking_lot::Mutex::new(JoinSet::new())),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a turn asynchronously (fire-and-forget)
    /// Needs a tokio runtime context; without one the entry is dropped
    pub fn log_move(
        &self,
        game_id: u32,
        turn: u32,
        score: u64,
        board: BoardSnapshot,
        chosen_move: Direction,
    ) {
        if !self.enabled {
            return;
        }

        let Ok(handle) = Handle::try_current() else {
            error!("Debug log entry for turn {} dropped: no tokio runtime", turn);
            return;
        };

        let entry = LogEntry {
            game_id,
            turn,
            chosen_move: chosen_move.as_str().to_string(),
            score,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let file_handle = self.file.clone();

        let mut pending = self.pending.lock();
        // Reap finished writes so the set only holds in-flight ones
        while pending.try_join_next().is_some() {}
        pending.spawn_on(Self::write_entry(file_handle, entry), &handle);
    }

    /// Waits until every write spawned so far has finished
    pub async fn drain(&self) {
        let mut pending = std::mem::take(&mut *self.pending.lock());
        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                error!("Debug log write task failed: {}", e);
            }
        }
    }

    /// Internal async function that performs the actual file write
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: LogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[tokio::test]
    async fn test_drain_waits_for_every_write() {
        let path = std::env::temp_dir().join(format!("grid_2048_drain_{}.jsonl", std::process::id()));
        let logger = DebugLogger::new(true, &path.to_string_lossy()).await;
        let board = Board::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);

        for turn in 0..200 {
            logger.log_move(1, turn, 0, board.serialize(), Direction::Left);
        }
        logger.drain().await;

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 200);

        // A second batch after an earlier drain is tracked as well
        logger.log_move(1, 200, 0, board.serialize(), Direction::Up);
        logger.drain().await;
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 201);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_disabled_logger_ignores_moves() {
        let logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_move(0, 0, 0, Board::empty().serialize(), Direction::Down);
    }
}
