// Core value types for the 2048 grid
// Positions are zero-based with x as the column and y as the row; y grows downwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side length of the square grid
pub const GRID_SIZE: usize = 4;

/// Tile value that wins the game
pub const WIN_VALUE: u32 = 2048;

/// Largest tile a 4x4 game can produce
pub const MAX_TILE_VALUE: u32 = 1 << 17;

/// Probability that a freshly spawned tile is a 4 rather than a 2
pub const FOUR_PROBABILITY: f64 = 0.1;

/// 2D coordinate on the grid
///
/// Signed so that a position one step past the edge can be represented;
/// such positions are simply treated as unavailable by the board.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Returns the position one step along `vector`
    pub fn offset(&self, vector: Position) -> Position {
        Position {
            x: self.x + vector.x,
            y: self.y + vector.y,
        }
    }
}

/// The four directions tiles can be pushed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns all directions in their canonical order (up, right, down, left)
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Converts direction to its lowercase name, as written to the debug log
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }

    /// Unit vector of tile movement in this direction
    pub fn vector(&self) -> Position {
        match self {
            Direction::Up => Position::new(0, -1),
            Direction::Right => Position::new(1, 0),
            Direction::Down => Position::new(0, 1),
            Direction::Left => Position::new(-1, 0),
        }
    }

    /// Calculates the neighbouring position in this direction
    pub fn apply(&self, position: &Position) -> Position {
        position.offset(self.vector())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// A single numbered piece on the grid
///
/// `previous_position` and `merged_from` are bookkeeping for the move in
/// progress. They are reset at the start of every move and never copied
/// into clones or snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub position: Position,
    pub value: u32,
    pub previous_position: Option<Position>,
    /// Positions the two source tiles occupied before the move that produced this tile
    pub merged_from: Option<[Position; 2]>,
}

impl Tile {
    pub fn new(position: Position, value: u32) -> Self {
        Tile {
            position,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    /// Records the current position as the previous one
    pub fn save_position(&mut self) {
        self.previous_position = Some(self.position);
    }

    pub fn update_position(&mut self, position: Position) {
        self.position = position;
    }

    /// A copy holding only position and value
    pub fn fresh_copy(&self) -> Tile {
        Tile::new(self.position, self.value)
    }

    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            position: self.position,
            value: self.value,
        }
    }
}

/// Serialized form of a tile
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSnapshot {
    pub position: Position,
    pub value: u32,
}

/// Serialized form of a board; `cells` is indexed `[x][y]`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub size: usize,
    pub cells: Vec<Vec<Option<TileSnapshot>>>,
}

/// Result of simulating a single directional move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// At least one tile changed cell
    pub moved: bool,
    /// Sum of the values of all tiles created by merges
    pub score: u64,
    /// A merge produced the winning tile
    pub won: bool,
}
